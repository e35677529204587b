use serde::Serialize;

use crate::error::SimulationError;
use crate::optimizer::LinearModel;

/// Solved trajectory of one decision variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSeries {
    pub name: String,
    pub values: Vec<(usize, f64)>,
}

impl VariableSeries {
    /// Values without their indices, in horizon order
    pub fn values_only(&self) -> Vec<f64> {
        self.values.iter().map(|(_, value)| *value).collect()
    }
}

/// Extracted variables (in requested order) and the realised objective value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResult {
    pub variables: Vec<VariableSeries>,
    pub objective_function: f64,
}

impl SolveResult {
    pub fn get(&self, name: &str) -> Option<&VariableSeries> {
        self.variables.iter().find(|series| series.name == name)
    }
}

/// Read the requested variables and the objective out of a solved model.
///
/// The objective is evaluated against the solved values rather than taken from the
/// backend. A name the model does not declare is a model invariant violation.
pub fn extract(model: &LinearModel, variables: &[String]) -> Result<SolveResult, SimulationError> {
    let variables = variables
        .iter()
        .map(|name| {
            Ok(VariableSeries {
                name: name.clone(),
                values: model.values_of(name)?,
            })
        })
        .collect::<Result<Vec<_>, SimulationError>>()?;

    Ok(SolveResult {
        variables,
        objective_function: model.objective_value()?,
    })
}
