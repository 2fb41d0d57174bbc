//! Web layer: a thin JSON surface over the tracker.
//!
//! The map front end consumes the published snapshot as plain data; no
//! rendering happens here.

mod dto;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{ApiClient, AppState};
