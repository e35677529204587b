//! Solver-independent linear model
//!
//! Holds indexed variable families (one column per horizon index), equality rows and a
//! linear objective. Once a backend has solved the model, solved column values are stored
//! here and read back by name through [`LinearModel::values_of`] and
//! [`LinearModel::objective_value`], so nothing downstream touches backend types.

use crate::config::Bounds;
use crate::error::SimulationError;

/// Column position inside a [`LinearModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(pub usize);

/// One scalar decision variable
#[derive(Debug, Clone)]
pub struct Column {
    pub label: String,
    pub bounds: Bounds,
}

/// A named family of columns indexed over the horizon
#[derive(Debug, Clone)]
pub struct VariableFamily {
    pub name: String,
    pub columns: Vec<ColumnId>,
}

impl VariableFamily {
    pub fn at(&self, index: usize) -> ColumnId {
        self.columns[index]
    }
}

/// Sparse linear combination of columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpression {
    pub terms: Vec<(ColumnId, f64)>,
}

impl LinearExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, column: ColumnId, coefficient: f64) -> Self {
        self.terms.push((column, coefficient));
        self
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(column, coefficient)| coefficient * values[column.0])
            .sum()
    }
}

/// `expression == rhs`
#[derive(Debug, Clone)]
pub struct EqualityRow {
    pub label: String,
    pub expression: LinearExpression,
    pub rhs: f64,
}

/// Expression to minimise
#[derive(Debug, Clone)]
pub struct Objective {
    pub label: String,
    pub expression: LinearExpression,
}

#[derive(Debug, Clone)]
pub struct LinearModel {
    name: String,
    columns: Vec<Column>,
    families: Vec<VariableFamily>,
    rows: Vec<EqualityRow>,
    objective: Option<Objective>,
    solution: Option<Vec<f64>>,
}

impl LinearModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            families: Vec::new(),
            rows: Vec::new(),
            objective: None,
            solution: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare `name[i]` for every `i` in `0..len`, all sharing the same bounds.
    pub fn add_family(&mut self, name: &str, len: usize, bounds: Bounds) -> VariableFamily {
        let columns: Vec<ColumnId> = (0..len)
            .map(|index| {
                let id = ColumnId(self.columns.len());
                self.columns.push(Column {
                    label: format!("{name}({index})"),
                    bounds,
                });
                id
            })
            .collect();

        let family = VariableFamily {
            name: name.to_string(),
            columns,
        };
        self.families.push(family.clone());
        family
    }

    pub fn add_row(&mut self, row: EqualityRow) {
        self.rows.push(row);
    }

    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn families(&self) -> &[VariableFamily] {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&VariableFamily> {
        self.families.iter().find(|family| family.name == name)
    }

    pub fn rows(&self) -> &[EqualityRow] {
        &self.rows
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }

    /// Store solved column values, one per column in declaration order.
    pub fn set_solution(&mut self, values: Vec<f64>) {
        assert_eq!(
            values.len(),
            self.columns.len(),
            "solution must hold one value per column"
        );
        self.solution = Some(values);
    }

    /// Solved `(index, value)` pairs of a variable family, ordered by index.
    pub fn values_of(&self, name: &str) -> Result<Vec<(usize, f64)>, SimulationError> {
        let family = self.family(name).ok_or_else(|| {
            SimulationError::ModelInvariant(format!("model declares no variable '{name}'"))
        })?;
        let solution = self.solved_values()?;

        Ok(family
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| (index, solution[column.0]))
            .collect())
    }

    /// Objective expression evaluated against the solved column values.
    pub fn objective_value(&self) -> Result<f64, SimulationError> {
        let objective = self.objective.as_ref().ok_or_else(|| {
            SimulationError::ModelInvariant("model has no objective".to_string())
        })?;
        Ok(objective.expression.evaluate(self.solved_values()?))
    }

    fn solved_values(&self) -> Result<&[f64], SimulationError> {
        self.solution.as_deref().ok_or_else(|| {
            SimulationError::ModelInvariant(format!("model '{}' has not been solved", self.name))
        })
    }
}
