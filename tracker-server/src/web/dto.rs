//! Request/response DTOs for the web layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AggregatedSnapshot, CycleStatus, Direction, EnrichedVehicle};
use crate::engine::{DirectionBoard, LineArrivals};
use crate::olhovivo::{ArrivingVehicleDto, LineDto, StopArrivalsDto};

/// Body for `PUT /api/watch`.
#[derive(Debug, Deserialize)]
pub struct WatchRequest {
    /// Raw search terms: line codes and fleet prefixes, mixed.
    pub terms: Vec<String>,
}

/// Response for `PUT /api/watch`.
#[derive(Debug, Serialize)]
pub struct WatchResponse {
    /// Terms now being tracked, after trimming and dropping blanks.
    pub terms: Vec<String>,
}

/// Query for `GET /api/lines/search`.
#[derive(Debug, Deserialize)]
pub struct LineSearchQuery {
    pub q: String,
}

/// One resolved line record in a search response.
#[derive(Debug, Serialize)]
pub struct LineSearchResult {
    pub internal_id: u32,
    pub code: String,
    pub direction: Option<Direction>,
    pub main_terminal: Option<String>,
    pub secondary_terminal: Option<String>,
}

impl From<&LineDto> for LineSearchResult {
    fn from(dto: &LineDto) -> Self {
        Self {
            internal_id: dto.cl,
            code: dto.public_code(),
            direction: Direction::from_sl(dto.sl),
            main_terminal: dto.tp.clone(),
            secondary_terminal: dto.ts.clone(),
        }
    }
}

/// Response for `GET /api/lines/search`.
#[derive(Debug, Serialize)]
pub struct LineSearchResponse {
    pub lines: Vec<LineSearchResult>,
}

/// Query for `GET /api/arrivals`.
#[derive(Debug, Deserialize)]
pub struct ArrivalsQuery {
    pub line: String,
}

/// One vehicle with an arrival estimate.
#[derive(Debug, Serialize)]
pub struct ArrivalEstimate {
    pub prefix: String,
    pub eta: String,
    pub accessible: bool,
    pub updated_at: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&ArrivingVehicleDto> for ArrivalEstimate {
    fn from(dto: &ArrivingVehicleDto) -> Self {
        Self {
            prefix: dto.p.clone(),
            eta: dto.t.clone(),
            accessible: dto.a,
            updated_at: dto.ta.clone(),
            latitude: dto.py,
            longitude: dto.px,
        }
    }
}

/// One stop with its predicted arrivals.
#[derive(Debug, Serialize)]
pub struct StopArrivals {
    pub stop_id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub arrivals: Vec<ArrivalEstimate>,
}

impl From<&StopArrivalsDto> for StopArrivals {
    fn from(dto: &StopArrivalsDto) -> Self {
        Self {
            stop_id: dto.cp,
            name: dto.np.clone(),
            latitude: dto.py,
            longitude: dto.px,
            arrivals: dto.vs.iter().map(ArrivalEstimate::from).collect(),
        }
    }
}

/// One direction of an arrivals board.
#[derive(Debug, Serialize)]
pub struct DirectionArrivals {
    pub direction: Direction,
    pub terminal: String,
    pub queried_at: Option<String>,
    pub stops: Vec<StopArrivals>,
}

impl From<&DirectionBoard> for DirectionArrivals {
    fn from(board: &DirectionBoard) -> Self {
        let terminal = match board.line.direction {
            Direction::MainTerminal => board.line.main_terminal.clone(),
            Direction::SecondaryTerminal => board.line.secondary_terminal.clone(),
        };

        Self {
            direction: board.line.direction,
            terminal,
            queried_at: board.prediction.hr.clone(),
            stops: board.prediction.ps.iter().map(StopArrivals::from).collect(),
        }
    }
}

/// Response for `GET /api/arrivals`.
#[derive(Debug, Serialize)]
pub struct ArrivalsResponse {
    pub line: String,
    pub main: DirectionArrivals,
    pub secondary: DirectionArrivals,
}

impl From<&LineArrivals> for ArrivalsResponse {
    fn from(arrivals: &LineArrivals) -> Self {
        Self {
            line: arrivals.main.line.code.clone(),
            main: DirectionArrivals::from(&arrivals.main),
            secondary: DirectionArrivals::from(&arrivals.secondary),
        }
    }
}

/// Response for `GET /api/snapshot`.
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub vehicles: Vec<EnrichedVehicle>,
    pub count: usize,
    pub status: CycleStatus,
    pub progress: String,
    pub generation: u64,
    pub generated_at: DateTime<Utc>,
}

impl SnapshotResponse {
    pub fn from_snapshot(snapshot: AggregatedSnapshot, progress: String) -> Self {
        Self {
            count: snapshot.vehicle_count(),
            vehicles: snapshot.vehicles,
            status: snapshot.status,
            progress,
            generation: snapshot.generation,
            generated_at: snapshot.generated_at,
        }
    }
}
