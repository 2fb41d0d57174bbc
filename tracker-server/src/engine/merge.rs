//! Deduplication by fleet prefix.
//!
//! Two different vehicles never share a prefix, but inconsistent upstream
//! data can report the same prefix twice (e.g. in both directions at once,
//! or under two overlapping search terms). The tie-break is deterministic:
//! keep the report with the greater `ta` timestamp (ISO 8601 strings
//! compare chronologically); on a tie the later-processed report wins.

use std::collections::HashMap;

use crate::domain::{EnrichedVehicle, VehicleReport};

/// Deduplicate raw reports by prefix, keeping the freshest per vehicle.
/// First-seen ordering is preserved.
pub fn dedup_reports(reports: Vec<VehicleReport>) -> Vec<VehicleReport> {
    dedup_by(reports, |r| r.prefix.clone(), |r| r.updated_at.as_str())
}

/// Deduplicate enriched vehicles by prefix, keeping the freshest per
/// vehicle. When duplicates carry different attributions (line vs prefix
/// term), the surviving report's attribution is kept and the rest is
/// discarded.
pub fn dedup_enriched(vehicles: Vec<EnrichedVehicle>) -> Vec<EnrichedVehicle> {
    dedup_by(
        vehicles,
        |v| v.report.prefix.clone(),
        |v| v.report.updated_at.as_str(),
    )
}

fn dedup_by<T>(
    items: Vec<T>,
    key: impl Fn(&T) -> String,
    freshness: impl Fn(&T) -> &str,
) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    let mut seen: HashMap<String, usize> = HashMap::new();

    for item in items {
        let k = key(&item);
        match seen.get(&k) {
            Some(&i) => {
                if freshness(&item) >= freshness(&out[i]) {
                    out[i] = item;
                }
            }
            None => {
                seen.insert(k, out.len());
                out.push(item);
            }
        }
    }

    out
}
