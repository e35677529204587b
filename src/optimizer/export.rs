//! Textual model dumps (CPLEX LP and free MPS) with symbolic labels, written for debugging.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use strum::{Display, EnumString};

use crate::optimizer::model::LinearModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModelFormat {
    #[default]
    Lp,
    Mps,
}

impl ModelFormat {
    pub fn file_name(&self) -> String {
        format!("model.{self}")
    }
}

/// Write `model.<format>` into `directory` and return its path.
pub fn write_model(model: &LinearModel, format: ModelFormat, directory: &Path) -> io::Result<PathBuf> {
    let path = directory.join(format.file_name());
    let mut writer = BufWriter::new(File::create(&path)?);
    match format {
        ModelFormat::Lp => write_lp(model, &mut writer)?,
        ModelFormat::Mps => write_mps(model, &mut writer)?,
    }
    writer.flush()?;
    Ok(path)
}

pub fn write_lp<W: Write>(model: &LinearModel, out: &mut W) -> io::Result<()> {
    let columns = model.columns();

    writeln!(out, "\\* Source model: {} *\\", model.name())?;
    writeln!(out)?;

    if let Some(objective) = model.objective() {
        writeln!(out, "min")?;
        writeln!(out, "{}:", objective.label)?;
        for (column, coefficient) in &objective.expression.terms {
            writeln!(out, "{coefficient:+} {}", columns[column.0].label)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "s.t.")?;
    for row in model.rows() {
        writeln!(out)?;
        writeln!(out, "c_e_{}_:", row.label)?;
        for (column, coefficient) in &row.expression.terms {
            writeln!(out, "{coefficient:+} {}", columns[column.0].label)?;
        }
        writeln!(out, "= {}", row.rhs)?;
    }
    writeln!(out)?;

    writeln!(out, "bounds")?;
    for column in columns {
        writeln!(
            out,
            "   {} <= {} <= {}",
            column.bounds.min, column.label, column.bounds.max
        )?;
    }
    writeln!(out, "end")?;
    Ok(())
}

pub fn write_mps<W: Write>(model: &LinearModel, out: &mut W) -> io::Result<()> {
    let columns = model.columns();

    // Column-major view of objective and row coefficients
    let mut entries: Vec<Vec<(&str, f64)>> = vec![Vec::new(); columns.len()];
    if let Some(objective) = model.objective() {
        for (column, coefficient) in &objective.expression.terms {
            entries[column.0].push((objective.label.as_str(), *coefficient));
        }
    }
    for row in model.rows() {
        for (column, coefficient) in &row.expression.terms {
            entries[column.0].push((row.label.as_str(), *coefficient));
        }
    }

    writeln!(out, "NAME {}", model.name())?;
    if model.objective().is_some() {
        writeln!(out, "OBJSENSE")?;
        writeln!(out, "    MIN")?;
    }

    writeln!(out, "ROWS")?;
    if let Some(objective) = model.objective() {
        writeln!(out, " N  {}", objective.label)?;
    }
    for row in model.rows() {
        writeln!(out, " E  {}", row.label)?;
    }

    writeln!(out, "COLUMNS")?;
    let objective_label = model.objective().map(|objective| objective.label.as_str());
    for (column, column_entries) in columns.iter().zip(&entries) {
        if column_entries.is_empty() {
            // keep the column declared even when it appears nowhere
            if let Some(label) = objective_label {
                writeln!(out, "    {}  {}  0", column.label, label)?;
            }
            continue;
        }
        for (row_label, coefficient) in column_entries {
            writeln!(out, "    {}  {}  {}", column.label, row_label, coefficient)?;
        }
    }

    writeln!(out, "RHS")?;
    for row in model.rows() {
        if row.rhs != 0.0 {
            writeln!(out, "    RHS  {}  {}", row.label, row.rhs)?;
        }
    }

    writeln!(out, "BOUNDS")?;
    for column in columns {
        if column.bounds.min == column.bounds.max {
            writeln!(out, " FX BND  {}  {}", column.label, column.bounds.min)?;
        } else {
            writeln!(out, " LO BND  {}  {}", column.label, column.bounds.min)?;
            writeln!(out, " UP BND  {}  {}", column.label, column.bounds.max)?;
        }
    }
    writeln!(out, "ENDATA")?;
    Ok(())
}
