//! Multi-source vehicle aggregation engine.
//!
//! The core of the tracker: given a mixed list of search terms (public
//! line codes and fleet prefixes), concurrently queries the upstream API
//! across many lines, merges the results, deduplicates by fleet prefix,
//! and republishes the merged snapshot on a fixed interval.

mod arrivals;
mod config;
mod cycle;
mod lines;
mod merge;
mod poller;
mod prefix;
mod source;

#[cfg(test)]
mod cycle_tests;

pub use arrivals::{DirectionBoard, LineArrivals, arrivals_for_line};
pub use config::EngineConfig;
pub use cycle::{CycleProgress, run_cycle};
pub use lines::{positions_for_line, resolve_line};
pub use merge::{dedup_enriched, dedup_reports};
pub use poller::{Poller, PollerHandle, Tracker};
pub use prefix::{find_by_prefixes, prefix_matches};
pub use source::TransitApi;
