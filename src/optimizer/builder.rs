use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::Configuration;
use crate::error::SimulationError;
use crate::optimizer::constraints::dynamics_rows;
use crate::optimizer::export::{write_model, ModelFormat};
use crate::optimizer::model::LinearModel;
use crate::optimizer::objective::heating_cost;
use crate::series::DerivedSeries;

pub const TEMPERATURE_HOUSE: &str = "temperature_house";
pub const POWER_HEATER: &str = "power_heater";

/// Decision variables the heating model declares
pub const DECISION_VARIABLES: [&str; 2] = [TEMPERATURE_HOUSE, POWER_HEATER];

/// Where to dump the unsolved model when debugging
#[derive(Debug, Clone)]
pub struct DebugDump {
    pub directory: PathBuf,
    pub format: ModelFormat,
}

/// Assembles the heating LP from validated inputs and derived series.
pub struct ModelBuilder<'a> {
    config: &'a Configuration,
    series: &'a DerivedSeries,
    debug_dump: Option<DebugDump>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(config: &'a Configuration, series: &'a DerivedSeries) -> Self {
        Self {
            config,
            series,
            debug_dump: None,
        }
    }

    pub fn with_debug_dump(mut self, dump: Option<DebugDump>) -> Self {
        self.debug_dump = dump;
        self
    }

    pub fn build(&self) -> Result<LinearModel, SimulationError> {
        self.series.assert_aligned();
        let steps = self.series.len();

        let mut model = LinearModel::new("heating");

        // Bounds are uniform over the horizon
        let temperature_house =
            model.add_family(TEMPERATURE_HOUSE, steps, self.config.temperature_bounds());
        let power_heater = model.add_family(POWER_HEATER, steps, self.config.power_bounds());

        for row in dynamics_rows(self.config, self.series, &temperature_house, &power_heater) {
            model.add_row(row);
        }
        model.set_objective(heating_cost(self.config, self.series, &power_heater));

        info!(
            steps,
            columns = model.columns().len(),
            rows = model.rows().len(),
            "heating model built"
        );

        if let Some(dump) = &self.debug_dump {
            let path = write_model(&model, dump.format, &dump.directory)?;
            debug!(path = %path.display(), format = %dump.format, "model written");
        }

        Ok(model)
    }
}
