//! Olho Vivo API response DTOs.
//!
//! Field names are the upstream single-letter JSON keys. The API omits or
//! nulls fields freely, so optional data stays `Option`.

use serde::Deserialize;

/// One line record from `GET /Linha/Buscar`.
///
/// A public line code resolves to up to two of these, one per direction
/// (`sl`). The displayed code is `lt` plus the `tl` suffix, e.g. `lt`
/// "1017" with `tl` 10 is the line "1017-10".
#[derive(Debug, Clone, Deserialize)]
pub struct LineDto {
    /// Internal line identifier, used for position queries.
    pub cl: u32,

    /// Whether the line runs in circular mode.
    pub lc: Option<bool>,

    /// First part of the public line code.
    pub lt: String,

    /// Direction: 1 = from main terminal, 2 = from secondary terminal.
    pub sl: u8,

    /// Numeric suffix of the public line code.
    pub tl: Option<u32>,

    /// Main terminal name.
    pub tp: Option<String>,

    /// Secondary terminal name.
    pub ts: Option<String>,
}

impl LineDto {
    /// Full public line code as shown to riders ("1017-10").
    pub fn public_code(&self) -> String {
        match self.tl {
            Some(tl) => format!("{}-{}", self.lt, tl),
            None => self.lt.clone(),
        }
    }
}

/// Response from `GET /Posicao/Linha`.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsDto {
    /// Time of the query, "HH:MM".
    pub hr: Option<String>,

    /// Vehicles currently reporting on this line.
    #[serde(default)]
    pub vs: Vec<VehicleDto>,
}

/// One reporting vehicle.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleDto {
    /// Fleet prefix painted on the vehicle.
    pub p: String,

    /// Wheelchair accessible.
    pub a: bool,

    /// Last GPS update timestamp (ISO 8601).
    pub ta: String,

    /// Latitude.
    pub py: f64,

    /// Longitude.
    pub px: f64,
}

/// Response from `GET /Previsao/Linha`: arrival estimates for one
/// directional line, grouped by stop.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrivalPredictionDto {
    /// Time of the query, "HH:MM".
    pub hr: Option<String>,

    /// Stops along the line, each with the vehicles predicted to arrive.
    #[serde(default)]
    pub ps: Vec<StopArrivalsDto>,
}

/// One stop and its predicted arrivals.
#[derive(Debug, Clone, Deserialize)]
pub struct StopArrivalsDto {
    /// Stop identifier.
    pub cp: u32,

    /// Stop name.
    pub np: String,

    /// Latitude.
    pub py: f64,

    /// Longitude.
    pub px: f64,

    /// Vehicles predicted to arrive at this stop.
    #[serde(default)]
    pub vs: Vec<ArrivingVehicleDto>,
}

/// One vehicle with an arrival estimate.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrivingVehicleDto {
    /// Fleet prefix painted on the vehicle.
    pub p: String,

    /// Predicted arrival time, "HH:MM".
    pub t: String,

    /// Wheelchair accessible.
    pub a: bool,

    /// Last GPS update timestamp (ISO 8601).
    pub ta: String,

    /// Latitude.
    pub py: f64,

    /// Longitude.
    pub px: f64,
}
