//! Cost-optimal heating schedule for a single building.
//!
//! Scalar inputs are turned into ambient temperature and electricity price curves, a linear
//! program is built over the horizon, solved with an LP backend, and the optimal house
//! temperature and heater power trajectories are read back together with the total cost.

pub mod cli;
pub mod config;
pub mod error;
pub mod optimizer;
pub mod output;
pub mod series;
pub mod simulation;
pub mod telemetry;
