//! # Simulation
//!
//! Sequences one heating optimisation run and hands back the extracted results.
//!
//! ```rust,no_run
//! use heat_scheduler::config::Configuration;
//! use heat_scheduler::optimizer::SolverType;
//! use heat_scheduler::simulation::{SimulationOptions, Simulator};
//!
//! let config = Configuration::load("config/default.toml".as_ref())?;
//! let options = SimulationOptions::new(SolverType::resolve("microlp")?);
//! let outcome = Simulator::new(&config, options).run()?;
//! println!("total cost: {:.2}", outcome.result.objective_function);
//! # Ok::<(), heat_scheduler::error::SimulationError>(())
//! ```

pub mod result;
pub mod simulator;

pub use result::{extract, SolveResult, VariableSeries};
pub use simulator::{SimulationOptions, SimulationOutcome, SimulationStage, Simulator};
