//! `SensorQC` Engine
//!
//! Streaming quality-control evaluation engine for environmental sensor
//! observations: per-observation and per-window checks, a metadata registry
//! contract, and the threshold-resolution algorithm that maps an observation
//! and time instant to the applicable threshold record.

pub mod admin;
pub mod checks;
pub mod config;
pub mod emit;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod telemetry;
pub mod threshold;
pub mod time;
