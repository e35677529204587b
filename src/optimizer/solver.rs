//! LP solver adapter
//!
//! Translates a [`LinearModel`] into a `good_lp` problem, runs the selected backend and
//! classifies the outcome. A solve is accepted only when the status is `ok` and the
//! termination condition is `optimal` or `feasible`; anything else becomes a
//! [`SimulationError::Solver`] carrying both strings.

use std::str::FromStr;
use std::time::Instant;

use good_lp::solvers::Solver;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::error::SimulationError;
use crate::optimizer::model::{LinearExpression, LinearModel, Objective};

/// LP backends known to the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SolverType {
    /// CBC (default, open-source)
    #[strum(serialize = "cbc")]
    Cbc,
    /// HiGHS
    #[strum(serialize = "highs")]
    HiGHS,
    /// Pure Rust simplex, no native library needed
    #[strum(serialize = "microlp")]
    Microlp,
}

impl SolverType {
    /// Resolve a solver identifier, failing if it is unknown or not compiled in.
    pub fn resolve(name: &str) -> Result<Self, SimulationError> {
        let solver = SolverType::from_str(name.trim()).map_err(|_| {
            SimulationError::SolverUnavailable(format!(
                "unknown solver '{name}', expected one of cbc, highs, microlp"
            ))
        })?;
        if !solver.is_available() {
            return Err(SimulationError::SolverUnavailable(format!(
                "solver '{solver}' is not compiled in, rebuild with `--features {solver}`"
            )));
        }
        Ok(solver)
    }

    pub fn is_available(&self) -> bool {
        match self {
            SolverType::Cbc => cfg!(feature = "cbc"),
            SolverType::HiGHS => cfg!(feature = "highs"),
            SolverType::Microlp => cfg!(feature = "microlp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SolverStatus {
    Ok,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TerminationCondition {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    Error,
}

/// Status pair reported for one solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverReport {
    pub status: SolverStatus,
    pub termination: TerminationCondition,
}

impl SolverReport {
    pub fn optimal() -> Self {
        Self {
            status: SolverStatus::Ok,
            termination: TerminationCondition::Optimal,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == SolverStatus::Ok
            && matches!(
                self.termination,
                TerminationCondition::Optimal | TerminationCondition::Feasible
            )
    }

    pub fn into_error(self) -> SimulationError {
        SimulationError::Solver {
            status: self.status.to_string(),
            termination: self.termination.to_string(),
        }
    }
}

impl From<&ResolutionError> for SolverReport {
    fn from(error: &ResolutionError) -> Self {
        match error {
            ResolutionError::Infeasible => Self {
                status: SolverStatus::Warning,
                termination: TerminationCondition::Infeasible,
            },
            ResolutionError::Unbounded => Self {
                status: SolverStatus::Warning,
                termination: TerminationCondition::Unbounded,
            },
            _ => Self {
                status: SolverStatus::Error,
                termination: TerminationCondition::Error,
            },
        }
    }
}

/// Runs a built model through an LP backend.
#[derive(Debug, Clone)]
pub struct SolverAdapter {
    solver_type: SolverType,
    verbose: bool,
}

impl SolverAdapter {
    pub fn new(solver_type: SolverType, verbose: bool) -> Self {
        Self {
            solver_type,
            verbose,
        }
    }

    pub fn solver_type(&self) -> SolverType {
        self.solver_type
    }

    /// Solve `model` in place. On acceptance the solved column values are stored in the
    /// model; on rejection the model is left unsolved.
    pub fn solve(&self, model: &mut LinearModel) -> Result<SolverReport, SimulationError> {
        let objective = model.objective().cloned().ok_or_else(|| {
            SimulationError::ModelInvariant("cannot solve a model without objective".to_string())
        })?;

        let started = Instant::now();
        let outcome = self.run_backend(model, &objective)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let report = match &outcome {
            Ok(_) => SolverReport::optimal(),
            Err(error) => {
                debug!(%error, "backend returned an error");
                SolverReport::from(error)
            }
        };

        if self.verbose {
            info!(
                solver = %self.solver_type,
                status = %report.status,
                termination = %report.termination,
                elapsed_ms,
                "solver finished"
            );
        } else {
            debug!(
                solver = %self.solver_type,
                status = %report.status,
                termination = %report.termination,
                elapsed_ms,
                "solver finished"
            );
        }

        match outcome {
            Ok(values) if report.is_accepted() => {
                model.set_solution(values);
                Ok(report)
            }
            _ => {
                warn!(
                    status = %report.status,
                    termination = %report.termination,
                    "problem not properly solved"
                );
                Err(report.into_error())
            }
        }
    }

    fn run_backend(
        &self,
        model: &LinearModel,
        objective: &Objective,
    ) -> Result<Result<Vec<f64>, ResolutionError>, SimulationError> {
        match self.solver_type {
            #[cfg(feature = "cbc")]
            SolverType::Cbc => {
                let log_level = if self.verbose { "1" } else { "0" };
                Ok(solve_with(
                    model,
                    objective,
                    good_lp::solvers::coin_cbc::coin_cbc,
                    |problem: &mut good_lp::solvers::coin_cbc::CoinCbcProblem| {
                        problem.set_parameter("log", log_level);
                    },
                ))
            }
            #[cfg(feature = "highs")]
            SolverType::HiGHS => Ok(solve_with(model, objective, good_lp::solvers::highs::highs, |_| {})),
            #[cfg(feature = "microlp")]
            SolverType::Microlp => Ok(solve_with(
                model,
                objective,
                good_lp::solvers::microlp::microlp,
                |_| {},
            )),
            #[allow(unreachable_patterns)]
            other => Err(SimulationError::SolverUnavailable(format!(
                "solver '{other}' is not compiled in"
            ))),
        }
    }
}

fn to_expression(expression: &LinearExpression, variables: &[Variable]) -> Expression {
    expression
        .terms
        .iter()
        .map(|(column, coefficient)| *coefficient * variables[column.0])
        .sum::<Expression>()
}

fn solve_with<S, F>(
    model: &LinearModel,
    objective: &Objective,
    solver: S,
    tune: F,
) -> Result<Vec<f64>, ResolutionError>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
    F: FnOnce(&mut S::Model),
{
    let mut problem = ProblemVariables::new();
    let variables: Vec<Variable> = model
        .columns()
        .iter()
        .map(|column| problem.add(variable().min(column.bounds.min).max(column.bounds.max)))
        .collect();

    let cost = to_expression(&objective.expression, &variables);
    let mut lp = problem.minimise(cost).using(solver);
    tune(&mut lp);

    for row in model.rows() {
        let lhs = to_expression(&row.expression, &variables);
        let rhs = row.rhs;
        lp = lp.with(constraint!(lhs == rhs));
    }

    let solution = lp.solve()?;
    Ok(variables.iter().map(|&variable| solution.value(variable)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use crate::optimizer::model::{EqualityRow, Objective};
    use rstest::rstest;

    #[rstest]
    #[case(SolverStatus::Ok, TerminationCondition::Optimal, true)]
    #[case(SolverStatus::Ok, TerminationCondition::Feasible, true)]
    #[case(SolverStatus::Ok, TerminationCondition::Infeasible, false)]
    #[case(SolverStatus::Ok, TerminationCondition::Unbounded, false)]
    #[case(SolverStatus::Warning, TerminationCondition::Optimal, false)]
    #[case(SolverStatus::Error, TerminationCondition::Feasible, false)]
    #[case(SolverStatus::Error, TerminationCondition::Error, false)]
    fn test_classification(
        #[case] status: SolverStatus,
        #[case] termination: TerminationCondition,
        #[case] accepted: bool,
    ) {
        assert_eq!(SolverReport { status, termination }.is_accepted(), accepted);
    }

    #[test]
    fn test_resolution_errors_map_to_reports() {
        let report = SolverReport::from(&ResolutionError::Infeasible);
        assert_eq!(report.status, SolverStatus::Warning);
        assert_eq!(report.termination, TerminationCondition::Infeasible);

        let report = SolverReport::from(&ResolutionError::Unbounded);
        assert_eq!(report.termination, TerminationCondition::Unbounded);

        let report = SolverReport::from(&ResolutionError::Other("boom"));
        assert_eq!(report.status, SolverStatus::Error);
    }

    #[test]
    fn test_rejected_report_carries_strings() {
        let error = SolverReport::from(&ResolutionError::Infeasible).into_error();
        match error {
            SimulationError::Solver { status, termination } => {
                assert_eq!(status, "warning");
                assert_eq!(termination, "infeasible");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[rstest]
    #[case("cbc", SolverType::Cbc)]
    #[case("CBC", SolverType::Cbc)]
    #[case("highs", SolverType::HiGHS)]
    #[case("microlp", SolverType::Microlp)]
    fn test_solver_type_parsing(#[case] name: &str, #[case] expected: SolverType) {
        assert_eq!(SolverType::from_str(name).unwrap(), expected);
        assert_eq!(expected.to_string(), name.to_lowercase());
    }

    #[test]
    fn test_unknown_solver_is_unavailable() {
        let error = SolverType::resolve("cplex").unwrap_err();
        assert!(matches!(error, SimulationError::SolverUnavailable(_)));
        assert!(error.to_string().contains("cplex"));
    }

    #[test]
    fn test_model_without_objective_is_rejected() {
        let mut model = LinearModel::new("empty");
        model.add_family("x", 1, Bounds { min: 0.0, max: 1.0 });
        let error = SolverAdapter::new(SolverType::Microlp, false)
            .solve(&mut model)
            .unwrap_err();
        assert!(matches!(error, SimulationError::ModelInvariant(_)));
    }

    #[cfg(feature = "microlp")]
    fn small_model(rhs: f64) -> LinearModel {
        // min x + 2y  s.t.  x + y == rhs,  x in [0, 3], y in [0, 5]
        let mut model = LinearModel::new("small");
        let x = model.add_family("x", 1, Bounds { min: 0.0, max: 3.0 });
        let y = model.add_family("y", 1, Bounds { min: 0.0, max: 5.0 });
        model.add_row(EqualityRow {
            label: "sum(0)".to_string(),
            expression: LinearExpression::new().term(x.at(0), 1.0).term(y.at(0), 1.0),
            rhs,
        });
        model.set_objective(Objective {
            label: "cost".to_string(),
            expression: LinearExpression::new().term(x.at(0), 1.0).term(y.at(0), 2.0),
        });
        model
    }

    #[cfg(feature = "microlp")]
    #[test]
    fn test_microlp_solves_small_model() {
        let mut model = small_model(4.0);
        let report = SolverAdapter::new(SolverType::Microlp, true)
            .solve(&mut model)
            .unwrap();

        assert!(report.is_accepted());
        let x = model.values_of("x").unwrap()[0].1;
        let y = model.values_of("y").unwrap()[0].1;
        assert!((x - 3.0).abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);
        assert!((model.objective_value().unwrap() - 5.0).abs() < 1e-6);
    }

    #[cfg(feature = "microlp")]
    #[test]
    fn test_microlp_infeasible_model_is_rejected() {
        let mut model = small_model(20.0);
        let error = SolverAdapter::new(SolverType::Microlp, false)
            .solve(&mut model)
            .unwrap_err();

        assert!(matches!(error, SimulationError::Solver { .. }));
        assert!(error.to_string().contains("infeasible"));
        assert!(!model.is_solved());
    }
}
