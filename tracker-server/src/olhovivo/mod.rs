//! SPTrans Olho Vivo API client.
//!
//! This module provides an HTTP client for the Olho Vivo real-time bus
//! API, which reports vehicle positions for São Paulo bus lines.
//!
//! Key characteristics of Olho Vivo:
//! - Sessions are established with `POST /Login/Autenticar` and tracked
//!   via a cookie; every other endpoint requires the session.
//! - A public line code ("1017-10") maps to up to **two** internal line
//!   records, one per direction of travel.
//! - An empty `Linha/Buscar` search returns a broad line list; the prefix
//!   resolver leans on that for discovery.

mod client;
mod error;
mod mock;
mod types;

pub use client::{OlhoVivoClient, OlhoVivoConfig};
pub use error::OlhoVivoError;
pub use mock::{MockOlhoVivo, mock_arrival, mock_line, mock_prediction, mock_vehicle};
pub use types::{ArrivalPredictionDto, ArrivingVehicleDto, LineDto, PositionsDto, StopArrivalsDto, VehicleDto};
