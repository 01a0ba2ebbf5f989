//! Simulation Interface
//!
//! The outer surface of the PBM simulator: an environment-configured driver
//! that wires the adjudication pipeline to either simulated or
//! Postgres-backed collaborators, replays or generates a claim feed, and
//! reports throughput and outcome statistics.

pub mod config;
pub mod simulation;

pub use config::SimConfig;
pub use simulation::{SimulationReport, SimulationService};
