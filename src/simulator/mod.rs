//! Balance simulator for Monte Carlo analysis.
//!
//! Runs many seeded encounters through the real combat orchestrator to
//! measure win rates, fight length and damage at a given matchup.

mod autopilot;
mod config;
mod report;
mod runner;

pub use autopilot::AutoPilot;
pub use config::{SimConfig, SimOpponent};
pub use report::SimReport;
pub use runner::{run_simulation, simulate_single_run, RunStats};
