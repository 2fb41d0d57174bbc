//! Real-time bus fleet tracker server.
//!
//! Answers "where are the vehicles for these bus lines, and where is
//! fleet vehicle 12345 right now?" by aggregating the SPTrans Olho Vivo
//! position API across many lines on a fixed polling interval.

pub mod cache;
pub mod domain;
pub mod engine;
pub mod olhovivo;
pub mod web;
