//! Fleet prefix resolution.
//!
//! Locates vehicles whose fleet prefix matches user-supplied search terms
//! by scanning a candidate set of lines in bounded-concurrency batches.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::EnrichedVehicle;

use super::config::EngineConfig;
use super::lines::positions_for_line;
use super::source::TransitApi;

/// Tiered, case-sensitive match of a vehicle prefix against a term.
///
/// A vehicle matches if its prefix equals the term, starts with it, or
/// contains it as a substring. All three tiers are accepted on purpose:
/// partial fleet-prefix lookups need the permissive substring tier, at
/// the cost of short terms matching unrelated vehicles.
pub fn prefix_matches(vehicle_prefix: &str, term: &str) -> bool {
    vehicle_prefix == term
        || vehicle_prefix.starts_with(term)
        || vehicle_prefix.contains(term)
}

/// Find vehicles matching the given prefix terms.
///
/// Candidate lines are, in order of preference: the supplied non-empty
/// `candidate_lines`; the dynamically discovered full line list (empty
/// upstream search); the static fallback set from the config. Candidates
/// are scanned in batches of `config.batch_size`: fetches within a batch
/// run in parallel, while batches themselves run sequentially to cap
/// upstream load. A failed line contributes nothing and the scan
/// continues.
///
/// Returns one entry per input term (possibly empty). A single vehicle
/// may match several terms and appear under each; deduplication is the
/// aggregation layer's job. `index_base` offsets the `line_index`
/// assigned to each term's matches, so prefix terms can be numbered after
/// the cycle's line terms.
pub async fn find_by_prefixes<A: TransitApi>(
    api: &A,
    terms: &[String],
    candidate_lines: Option<&[String]>,
    index_base: usize,
    config: &EngineConfig,
) -> HashMap<String, Vec<EnrichedVehicle>> {
    let mut results: HashMap<String, Vec<EnrichedVehicle>> =
        terms.iter().map(|t| (t.clone(), Vec::new())).collect();

    if terms.is_empty() {
        return results;
    }

    let candidates = match candidate_lines {
        Some(lines) if !lines.is_empty() => lines.to_vec(),
        _ => discover_candidates(api, config).await,
    };

    debug!(
        terms = terms.len(),
        candidates = candidates.len(),
        "starting prefix scan"
    );

    for batch in candidates.chunks(config.batch_size) {
        let fetches = batch.iter().map(|line_code| async move {
            (line_code.as_str(), positions_for_line(api, line_code).await)
        });

        for (line_code, reports) in join_all(fetches).await {
            for report in reports {
                for (term_index, term) in terms.iter().enumerate() {
                    if prefix_matches(&report.prefix, term) {
                        let hit = EnrichedVehicle::from_prefix(
                            report.clone(),
                            line_code,
                            index_base + term_index,
                        );
                        if let Some(hits) = results.get_mut(term) {
                            hits.push(hit);
                        }
                    }
                }
            }
        }
    }

    results
}

/// Determine the full candidate line list for a prefix scan.
///
/// The upstream API returns a broad line list for an empty search term;
/// that behaviour is undocumented, so a failed or empty discovery falls
/// back to the static set rather than failing the cycle.
async fn discover_candidates<A: TransitApi>(api: &A, config: &EngineConfig) -> Vec<String> {
    match api.search_lines("").await {
        Ok(records) if !records.is_empty() => {
            // Both directions share a public code; scan each line once.
            let mut codes: Vec<String> = Vec::new();
            for record in &records {
                let code = record.public_code();
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
            debug!(count = codes.len(), "discovered candidate lines");
            codes
        }
        Ok(_) => {
            warn!("line discovery returned nothing, using fallback scan list");
            config.fallback_scan_lines.clone()
        }
        Err(e) => {
            warn!(error = %e, "line discovery failed, using fallback scan list");
            config.fallback_scan_lines.clone()
        }
    }
}
