//! One aggregation cycle: authenticate, fetch, merge, dedup, snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::{AggregatedSnapshot, CycleStatus, EnrichedVehicle, partition_terms};

use super::config::EngineConfig;
use super::lines::positions_for_line;
use super::merge::dedup_enriched;
use super::prefix::find_by_prefixes;
use super::source::TransitApi;

/// Progress reporting for one cycle.
///
/// Overlapping cycles share a single progress channel, so reports pass a
/// generation gate of their own: once a newer cycle has reported, older
/// cycles fall silent. A closed gate (`u64::MAX`) silences everything.
pub struct CycleProgress {
    tx: Arc<watch::Sender<String>>,
    gate: Arc<AtomicU64>,
    generation: u64,
}

impl CycleProgress {
    /// Bind a progress channel and gate to one cycle's generation.
    pub fn new(tx: Arc<watch::Sender<String>>, gate: Arc<AtomicU64>, generation: u64) -> Self {
        Self {
            tx,
            gate,
            generation,
        }
    }

    /// Publish a progress message unless a newer cycle has reported.
    pub fn report(&self, message: impl Into<String>) {
        if self.gate.fetch_max(self.generation, Ordering::SeqCst) <= self.generation {
            self.tx.send_replace(message.into());
        }
    }
}

/// Run one full poll cycle over the given search terms.
///
/// Terms are classified into line codes and fleet prefixes. All line
/// terms are fetched in parallel (one resolution per term); all prefix
/// terms go through a single batched scan to bound upstream load. The
/// merged result is deduplicated by fleet prefix and stamped with the
/// cycle's generation.
///
/// An empty term list short-circuits to an idle snapshot with zero
/// network calls. An authentication failure fails this cycle fast: no
/// position fetches are issued. The snapshot it yields is a status
/// report, not an error; the next tick retries.
pub async fn run_cycle<A: TransitApi>(
    api: &A,
    terms: &[String],
    generation: u64,
    config: &EngineConfig,
    progress: &CycleProgress,
) -> AggregatedSnapshot {
    let (line_terms, prefix_terms) = partition_terms(terms);

    if line_terms.is_empty() && prefix_terms.is_empty() {
        return snapshot(Vec::new(), CycleStatus::Idle, String::new(), generation);
    }

    progress.report("authenticating");
    if !api.authenticate().await {
        warn!(generation, "cycle aborted: authentication failed");
        let message = "authentication failed".to_string();
        progress.report(message.clone());
        return snapshot(Vec::new(), CycleStatus::AuthFailed, message, generation);
    }

    let mut merged: Vec<EnrichedVehicle> = Vec::new();

    if !line_terms.is_empty() {
        progress.report(format!("fetching {} lines", line_terms.len()));

        let fetches = line_terms.iter().enumerate().map(|(index, code)| {
            let code = code.as_str();
            async move {
                let reports = positions_for_line(api, code).await;
                debug!(line = code, vehicles = reports.len(), "line fetched");
                reports
                    .into_iter()
                    .map(|r| EnrichedVehicle::from_line(r, code, index))
                    .collect::<Vec<_>>()
            }
        });

        merged.extend(join_all(fetches).await.into_iter().flatten());
    }

    if !prefix_terms.is_empty() {
        progress.report(format!("resolving {} prefixes", prefix_terms.len()));

        let hits_by_term =
            find_by_prefixes(api, &prefix_terms, None, line_terms.len(), config).await;

        // Merge in input term order so the outcome is deterministic for a
        // fixed set of completed fetches.
        for term in &prefix_terms {
            if let Some(hits) = hits_by_term.get(term) {
                merged.extend(hits.iter().cloned());
            }
        }
    }

    let vehicles = dedup_enriched(merged);

    let status = if vehicles.is_empty() {
        CycleStatus::NothingFound
    } else {
        CycleStatus::Ok
    };

    let message = format!(
        "done: {} lines, {} prefixes, {} vehicles",
        line_terms.len(),
        prefix_terms.len(),
        vehicles.len()
    );
    progress.report(message.clone());

    snapshot(vehicles, status, message, generation)
}

fn snapshot(
    vehicles: Vec<EnrichedVehicle>,
    status: CycleStatus,
    progress: String,
    generation: u64,
) -> AggregatedSnapshot {
    AggregatedSnapshot {
        vehicles,
        status,
        progress,
        generation,
        generated_at: Utc::now(),
    }
}
