//! House temperature dynamics
//!
//! One equality per horizon index:
//! - index 0 pins the house temperature to the initial temperature,
//! - every later index ties it to the ambient temperature plus the heater contribution,
//!   `temperature_house[t] == temperature_ambient[t] + heat_cool_ratio * power_heater[t]`.
//!
//! The later rule carries no term in `temperature_house[t - 1]`.

use crate::config::Configuration;
use crate::optimizer::model::{EqualityRow, LinearExpression, VariableFamily};
use crate::series::DerivedSeries;

pub const DYNAMICS_ROW: &str = "temperature_house_eqn";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DynamicsRule {
    Boundary {
        initial_temperature: f64,
    },
    Recurrence {
        temperature_ambient: f64,
        heat_cool_ratio: f64,
    },
}

impl DynamicsRule {
    pub fn for_step(t: usize, config: &Configuration, series: &DerivedSeries) -> Self {
        if t == 0 {
            DynamicsRule::Boundary {
                initial_temperature: config.initial_temperature(),
            }
        } else {
            DynamicsRule::Recurrence {
                temperature_ambient: series.temperature_ambient[t],
                heat_cool_ratio: series.heat_cool_ratio,
            }
        }
    }

    /// Equality row for index `t`, moved into `expression == rhs` form.
    pub fn row(
        &self,
        t: usize,
        temperature_house: &VariableFamily,
        power_heater: &VariableFamily,
    ) -> EqualityRow {
        let (expression, rhs) = match *self {
            DynamicsRule::Boundary {
                initial_temperature,
            } => (
                LinearExpression::new().term(temperature_house.at(t), 1.0),
                initial_temperature,
            ),
            DynamicsRule::Recurrence {
                temperature_ambient,
                heat_cool_ratio,
            } => (
                LinearExpression::new()
                    .term(temperature_house.at(t), 1.0)
                    .term(power_heater.at(t), -heat_cool_ratio),
                temperature_ambient,
            ),
        };

        EqualityRow {
            label: format!("{DYNAMICS_ROW}({t})"),
            expression,
            rhs,
        }
    }
}

/// Dynamics rows for the whole horizon, in index order.
pub fn dynamics_rows(
    config: &Configuration,
    series: &DerivedSeries,
    temperature_house: &VariableFamily,
    power_heater: &VariableFamily,
) -> Vec<EqualityRow> {
    series
        .horizon
        .iter()
        .map(|&t| DynamicsRule::for_step(t, config, series).row(t, temperature_house, power_heater))
        .collect()
}
