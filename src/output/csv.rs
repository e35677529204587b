use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::simulation::SolveResult;

pub const OBJECTIVE_FILE: &str = "objective_function";

#[derive(Debug, Serialize)]
struct Row {
    index: usize,
    value: f64,
}

/// Write `<name>.csv` for every extracted variable plus `objective_function.csv`.
pub fn write_results(result: &SolveResult, directory: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(result.variables.len() + 1);

    for series in &result.variables {
        let rows = series.values.iter().map(|&(index, value)| Row { index, value });
        written.push(write_rows(directory, &series.name, rows)?);
    }

    let objective = std::iter::once(Row {
        index: 0,
        value: result.objective_function,
    });
    written.push(write_rows(directory, OBJECTIVE_FILE, objective)?);

    Ok(written)
}

fn write_rows(directory: &Path, name: &str, rows: impl Iterator<Item = Row>) -> Result<PathBuf> {
    let path = directory.join(format!("{name}.csv"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), "results written");
    Ok(path)
}
