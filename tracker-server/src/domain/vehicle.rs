//! Vehicle position reports.

use serde::Serialize;

use super::Direction;

/// A point-in-time position report for one vehicle.
///
/// Ephemeral: lives only for the poll cycle that fetched it and is replaced
/// wholesale on the next one. The `prefix` is the fleet number painted on
/// the vehicle and is unique per physical vehicle at any given instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleReport {
    /// Fleet prefix (`p`), e.g. "12345".
    pub prefix: String,

    /// Wheelchair accessible (`a`).
    pub accessible: bool,

    /// Last GPS update timestamp (`ta`), ISO 8601 as sent by upstream.
    pub updated_at: String,

    /// Latitude (`py`).
    pub latitude: f64,

    /// Longitude (`px`).
    pub longitude: f64,

    /// Direction of the line record that reported this vehicle.
    pub direction: Direction,
}

/// Which kind of search term produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    /// Found by querying a line code directly.
    Line,

    /// Found by scanning candidate lines for a fleet prefix.
    Prefix,
}

/// A vehicle report attributed to the search term that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedVehicle {
    #[serde(flatten)]
    pub report: VehicleReport,

    /// The line code this vehicle is attributed to. For line-term results
    /// this is the requested code; for prefix results it is the line the
    /// vehicle was actually found in.
    pub line_code: String,

    /// Stable index of the originating term, for colour/ordering in the UI.
    pub line_index: usize,

    /// Whether a line term or a prefix term produced this entry.
    pub search_kind: SearchKind,

    /// For prefix results, the line the match occurred in. May differ from
    /// any requested line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_in_line: Option<String>,
}

impl EnrichedVehicle {
    /// Wrap a report found by querying its line directly.
    pub fn from_line(report: VehicleReport, line_code: &str, line_index: usize) -> Self {
        Self {
            report,
            line_code: line_code.to_string(),
            line_index,
            search_kind: SearchKind::Line,
            found_in_line: None,
        }
    }

    /// Wrap a report located by prefix scan in `found_in_line`.
    pub fn from_prefix(report: VehicleReport, found_in_line: &str, line_index: usize) -> Self {
        Self {
            report,
            line_code: found_in_line.to_string(),
            line_index,
            search_kind: SearchKind::Prefix,
            found_in_line: Some(found_in_line.to_string()),
        }
    }
}
