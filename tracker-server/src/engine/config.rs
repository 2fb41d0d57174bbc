//! Aggregation engine configuration.

use std::time::Duration;

/// Lines scanned for fleet prefixes when discovery fails.
///
/// The line set operated out of the Spencer D1 garage, which this
/// deployment tracks. The upstream "empty search returns everything"
/// discovery behaviour is undocumented, so this static set is the
/// authoritative safety net for prefix lookups.
const DEFAULT_SCAN_LINES: &[&str] = &[
    "1017-10", "1020-10", "1024-10", "1025-10", "1026-10", "8015-10",
    "8015-21", "8016-10", "848L-10", "9784-10", "N137-11",
];

/// Configuration parameters for the aggregation engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How often to re-run a full poll cycle.
    pub poll_interval: Duration,

    /// Lines per prefix-scan batch. Fetches within a batch run in
    /// parallel; batches run sequentially, so this bounds in-flight
    /// requests against the upstream API.
    pub batch_size: usize,

    /// Fallback candidate lines for prefix search when dynamic line
    /// discovery fails or yields nothing.
    pub fallback_scan_lines: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(15),
            batch_size: 8,
            fallback_scan_lines: DEFAULT_SCAN_LINES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
