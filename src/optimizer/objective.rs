use crate::config::Configuration;
use crate::optimizer::model::{LinearExpression, Objective, VariableFamily};
use crate::series::DerivedSeries;

pub const OBJECTIVE: &str = "objective_eqn";

/// Total electricity cost of running the heater over the horizon:
/// `sum_t cost_electricity[t] * power_heater[t] * step_size * conversion_factor`
pub fn heating_cost(
    config: &Configuration,
    series: &DerivedSeries,
    power_heater: &VariableFamily,
) -> Objective {
    let scale = f64::from(config.step_size()) * config.conversion_factor();

    let expression = series
        .horizon
        .iter()
        .fold(LinearExpression::new(), |expression, &t| {
            expression.term(power_heater.at(t), series.cost_electricity[t] * scale)
        });

    Objective {
        label: OBJECTIVE.to_string(),
        expression,
    }
}
