//! Interval polling with cancellation.
//!
//! A [`Poller`] re-runs the aggregation cycle on a fixed interval for one
//! term list. Every cycle is stamped with a monotonically increasing
//! generation and results pass a publish gate: a cycle may only publish
//! if nothing newer has published before it. Progress text passes a gate
//! of its own, so a slow stale cycle cannot overwrite a newer cycle's
//! status line either. Stopping the poller closes both gates, so
//! in-flight cycles from a superseded term list can never overwrite a
//! newer snapshot.
//!
//! [`Tracker`] owns the current poller and swaps it out wholesale when
//! the term list changes; the fresh poller gets fresh channels, so the
//! old one's results have nowhere left to land.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::AggregatedSnapshot;

use super::config::EngineConfig;
use super::cycle::{CycleProgress, run_cycle};
use super::source::TransitApi;

/// Decide whether a finished cycle may publish its snapshot.
///
/// Advances the gate to `generation` and allows publication only if the
/// gate was previously below it. A closed gate (`u64::MAX`) rejects
/// everything.
fn try_claim_publish(gate: &AtomicU64, generation: u64) -> bool {
    gate.fetch_max(generation, Ordering::SeqCst) < generation
}

/// A running poll subscription for one fixed term list.
///
/// Dropping the handle stops the poller.
pub struct PollerHandle {
    snapshots: watch::Receiver<AggregatedSnapshot>,
    progress: watch::Receiver<String>,
    publish_gate: Arc<AtomicU64>,
    progress_gate: Arc<AtomicU64>,
    driver: JoinHandle<()>,
}

impl PollerHandle {
    /// Subscribe to published snapshots.
    pub fn snapshots(&self) -> watch::Receiver<AggregatedSnapshot> {
        self.snapshots.clone()
    }

    /// Subscribe to the incrementally updated progress string.
    pub fn progress(&self) -> watch::Receiver<String> {
        self.progress.clone()
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> AggregatedSnapshot {
        self.snapshots.borrow().clone()
    }

    /// The current progress string.
    pub fn latest_progress(&self) -> String {
        self.progress.borrow().clone()
    }

    /// Stop polling. No further ticks fire and no in-flight cycle can
    /// publish a snapshot or progress text after this returns.
    pub fn stop(&self) {
        self.publish_gate.store(u64::MAX, Ordering::SeqCst);
        self.progress_gate.store(u64::MAX, Ordering::SeqCst);
        self.driver.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Interval-driven aggregation poller.
pub struct Poller;

impl Poller {
    /// Start polling the given term list.
    ///
    /// The first cycle starts immediately; later ones fire every
    /// `config.poll_interval`. Each tick spawns its cycle as an
    /// independent task, so a cycle outliving the interval delays
    /// nothing; the generation gates keep the slower cycle's stale
    /// snapshot and progress text from clobbering newer ones.
    pub fn start<A>(api: Arc<A>, terms: Vec<String>, config: EngineConfig) -> PollerHandle
    where
        A: TransitApi + 'static,
    {
        let (snap_tx, snap_rx) = watch::channel(AggregatedSnapshot::idle());
        let (prog_tx, prog_rx) = watch::channel(String::new());
        let snap_tx = Arc::new(snap_tx);
        let prog_tx = Arc::new(prog_tx);

        let publish_gate = Arc::new(AtomicU64::new(0));
        let progress_gate = Arc::new(AtomicU64::new(0));
        let next_generation = Arc::new(AtomicU64::new(1));
        let terms = Arc::new(terms);
        let config = Arc::new(config);

        let gate = publish_gate.clone();
        let prog_gate = progress_gate.clone();
        let driver = tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.poll_interval);
            loop {
                interval.tick().await;
                let generation = next_generation.fetch_add(1, Ordering::SeqCst);

                let api = api.clone();
                let terms = terms.clone();
                let config = config.clone();
                let snap_tx = snap_tx.clone();
                let progress =
                    CycleProgress::new(prog_tx.clone(), prog_gate.clone(), generation);
                let gate = gate.clone();

                tokio::spawn(async move {
                    let snapshot =
                        run_cycle(&*api, &terms, generation, &config, &progress).await;

                    if try_claim_publish(&gate, generation) {
                        debug!(
                            generation,
                            vehicles = snapshot.vehicle_count(),
                            "snapshot published"
                        );
                        let _ = snap_tx.send(snapshot);
                    } else {
                        debug!(generation, "stale cycle result discarded");
                    }
                });
            }
        });

        PollerHandle {
            snapshots: snap_rx,
            progress: prog_rx,
            publish_gate,
            progress_gate,
            driver,
        }
    }
}

/// Owns the poller for whatever term list is currently being tracked.
pub struct Tracker<A: TransitApi + 'static> {
    api: Arc<A>,
    config: EngineConfig,
    inner: Mutex<TrackerInner>,
}

struct TrackerInner {
    handle: Option<PollerHandle>,
    terms: Vec<String>,
}

impl<A: TransitApi + 'static> Tracker<A> {
    /// Create a tracker with no active subscription.
    pub fn new(api: Arc<A>, config: EngineConfig) -> Self {
        Self {
            api,
            config,
            inner: Mutex::new(TrackerInner {
                handle: None,
                terms: Vec::new(),
            }),
        }
    }

    /// Replace the tracked term list.
    ///
    /// Stops the previous poller first, so its in-flight cycles cannot
    /// publish into the new subscription. An empty (or all-blank) list
    /// stops tracking entirely.
    pub async fn set_terms(&self, terms: Vec<String>) {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let mut inner = self.inner.lock().await;

        if let Some(old) = inner.handle.take() {
            old.stop();
        }
        inner.terms = terms.clone();

        if terms.is_empty() {
            info!("tracking cleared");
            return;
        }

        info!(?terms, "tracking new term list");
        inner.handle = Some(Poller::start(
            self.api.clone(),
            terms,
            self.config.clone(),
        ));
    }

    /// Stop tracking.
    pub async fn clear(&self) {
        self.set_terms(Vec::new()).await;
    }

    /// The currently tracked terms.
    pub async fn terms(&self) -> Vec<String> {
        self.inner.lock().await.terms.clone()
    }

    /// The latest published snapshot, or an idle one if not tracking.
    pub async fn snapshot(&self) -> AggregatedSnapshot {
        let inner = self.inner.lock().await;
        match &inner.handle {
            Some(handle) => handle.latest(),
            None => AggregatedSnapshot::idle(),
        }
    }

    /// The latest progress string, or empty if not tracking.
    pub async fn progress(&self) -> String {
        let inner = self.inner.lock().await;
        match &inner.handle {
            Some(handle) => handle.latest_progress(),
            None => String::new(),
        }
    }
}
