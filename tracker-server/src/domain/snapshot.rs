//! Published poll-cycle snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::EnrichedVehicle;

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// No terms are being tracked.
    Idle,

    /// Cycle completed with at least one vehicle.
    Ok,

    /// Cycle completed but no vehicle matched any term. Not an error:
    /// the lines may simply have nothing reporting right now.
    NothingFound,

    /// Upstream authentication failed; no position fetches were issued.
    AuthFailed,
}

/// The merged, deduplicated result of one poll cycle.
///
/// Immutable once published: each cycle builds a fresh snapshot and swaps
/// it in atomically; consumers never see partial state. Within a snapshot
/// every vehicle prefix appears exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedSnapshot {
    /// Deduplicated vehicles, unique by fleet prefix.
    pub vehicles: Vec<EnrichedVehicle>,

    /// Cycle outcome.
    pub status: CycleStatus,

    /// Human-readable description of what the cycle did.
    pub progress: String,

    /// Cycle generation, monotonically increasing per tracked term list.
    pub generation: u64,

    /// When this snapshot was assembled.
    pub generated_at: DateTime<Utc>,
}

impl AggregatedSnapshot {
    /// An empty snapshot for the idle (no terms) state.
    pub fn idle() -> Self {
        Self {
            vehicles: Vec::new(),
            status: CycleStatus::Idle,
            progress: String::new(),
            generation: 0,
            generated_at: Utc::now(),
        }
    }

    /// Number of vehicles in the snapshot.
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }
}
