//! Line position fetching.
//!
//! Resolves a public line code to its directional records and fetches the
//! current positions for each direction in parallel.

use futures::future::join_all;
use tracing::debug;

use crate::domain::{LineRecord, VehicleReport};
use crate::olhovivo::VehicleDto;

use super::merge::dedup_reports;
use super::source::TransitApi;

/// Resolve a public line code to its directional records.
///
/// A code may legitimately match one record per direction. Zero matches
/// yields an empty list rather than an error: "no such line" and "line
/// not currently running" look the same to callers. Search failures are
/// absorbed to empty, and records with an out-of-range `sl` are bad
/// upstream data and are dropped.
pub async fn resolve_line<A: TransitApi>(api: &A, line_code: &str) -> Vec<LineRecord> {
    let dtos = match api.search_lines(line_code).await {
        Ok(dtos) => dtos,
        Err(e) => {
            debug!(line = line_code, error = %e, "line search failed, using empty");
            return Vec::new();
        }
    };

    if dtos.is_empty() {
        debug!(line = line_code, "no line records found");
        return Vec::new();
    }

    dtos.iter()
        .filter_map(|dto| {
            let record = LineRecord::from_dto(dto);
            if record.is_none() {
                debug!(internal_id = dto.cl, sl = dto.sl, "unknown direction, dropping record");
            }
            record
        })
        .collect()
}

/// Fetch current vehicle positions for one public line code.
///
/// The code is first resolved via [`resolve_line`]. Each direction's
/// fetch runs in parallel and an individual failure contributes an empty
/// list rather than failing the whole operation. The union is
/// deduplicated by fleet prefix.
pub async fn positions_for_line<A: TransitApi>(api: &A, line_code: &str) -> Vec<VehicleReport> {
    let records = resolve_line(api, line_code).await;

    let fetches = records.iter().map(|record| async move {
        match api.line_positions(record.internal_id).await {
            Ok(vehicles) => tag_with_direction(record, vehicles),
            Err(e) => {
                debug!(
                    line = line_code,
                    internal_id = record.internal_id,
                    error = %e,
                    "position fetch failed for one direction, using empty"
                );
                Vec::new()
            }
        }
    });

    let per_direction = join_all(fetches).await;
    let all: Vec<VehicleReport> = per_direction.into_iter().flatten().collect();

    dedup_reports(all)
}

/// Tag each raw vehicle with the direction of the record that reported it.
fn tag_with_direction(record: &LineRecord, vehicles: Vec<VehicleDto>) -> Vec<VehicleReport> {
    vehicles
        .into_iter()
        .map(|v| VehicleReport {
            prefix: v.p,
            accessible: v.a,
            updated_at: v.ta,
            latitude: v.py,
            longitude: v.px,
            direction: record.direction,
        })
        .collect()
}
