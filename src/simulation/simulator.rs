use std::path::PathBuf;

use strum::Display;
use tracing::{debug, info};

use crate::config::Configuration;
use crate::error::SimulationError;
use crate::optimizer::{DebugDump, ModelBuilder, ModelFormat, SolverAdapter, SolverReport, SolverType};
use crate::series::DerivedSeries;
use crate::simulation::result::{extract, SolveResult};

/// Progress of a [`Simulator`]. A failed run stays at the last stage it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationStage {
    Uninitialized,
    BuiltAndSolved,
    Extracted,
}

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub solver: SolverType,
    /// Echo solver output and dump the unsolved model
    pub debug: bool,
    pub model_format: ModelFormat,
    /// Directory receiving the model dump in debug mode
    pub output_path: Option<PathBuf>,
}

impl SimulationOptions {
    pub fn new(solver: SolverType) -> Self {
        Self {
            solver,
            debug: false,
            model_format: ModelFormat::default(),
            output_path: None,
        }
    }
}

/// Everything a caller needs to persist or plot a finished run
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub stage: SimulationStage,
    pub series: DerivedSeries,
    pub result: SolveResult,
    pub report: SolverReport,
}

/// Runs derive series -> build model -> solve -> extract for one configuration.
pub struct Simulator<'a> {
    config: &'a Configuration,
    options: SimulationOptions,
    stage: SimulationStage,
}

impl<'a> Simulator<'a> {
    pub fn new(config: &'a Configuration, options: SimulationOptions) -> Self {
        Self {
            config,
            options,
            stage: SimulationStage::Uninitialized,
        }
    }

    pub fn stage(&self) -> SimulationStage {
        self.stage
    }

    fn advance(&mut self, stage: SimulationStage) {
        debug!(from = %self.stage, to = %stage, "stage transition");
        self.stage = stage;
    }

    pub fn run(&mut self) -> Result<SimulationOutcome, SimulationError> {
        self.stage = SimulationStage::Uninitialized;
        debug!(stage = %self.stage, solver = %self.options.solver, "starting simulation");

        let series = DerivedSeries::derive(self.config);

        let dump = match (&self.options.output_path, self.options.debug) {
            (Some(directory), true) => Some(DebugDump {
                directory: directory.clone(),
                format: self.options.model_format,
            }),
            _ => None,
        };
        let mut model = ModelBuilder::new(self.config, &series)
            .with_debug_dump(dump)
            .build()?;

        let report = SolverAdapter::new(self.options.solver, self.options.debug).solve(&mut model)?;
        self.advance(SimulationStage::BuiltAndSolved);

        let result = extract(&model, self.config.variables())?;
        self.advance(SimulationStage::Extracted);
        info!(
            stage = %self.stage,
            steps = series.len(),
            objective = result.objective_function,
            "simulation finished"
        );

        Ok(SimulationOutcome {
            stage: self.stage,
            series,
            result,
            report,
        })
    }
}
