//! Domain types for the fleet tracker.
//!
//! This module contains the core model: classified search terms, resolved
//! line records, vehicle position reports, and the immutable snapshot that
//! each poll cycle publishes. Types validate at construction so downstream
//! code can trust them.

mod line;
mod snapshot;
mod term;
mod vehicle;

pub use line::{Direction, LineRecord};
pub use snapshot::{AggregatedSnapshot, CycleStatus};
pub use term::{SearchTerm, partition_terms};
pub use vehicle::{EnrichedVehicle, SearchKind, VehicleReport};
