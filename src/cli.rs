//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::optimizer::ModelFormat;

#[derive(Debug, Parser)]
#[command(name = "heat-scheduler")]
#[command(author, version, about = "Simulation of heating a building")]
#[command(
    long_about = "Computes the cheapest heater power schedule for one building over a time horizon.\n\
    \nThe inputs file is TOML. Results are written as CSV files and SVG charts into the\n\
    output directory, which is created when missing.\n\
    \nThe default solver is cbc, which is only available when built with `--features cbc`\n\
    (needs the native CBC library). Default builds ship the pure Rust backend; select it\n\
    with `-s microlp`.\n\
    \nExamples:\n  \
    heat-scheduler -i config/default.toml -o results\n  \
    heat-scheduler -i config/default.toml -o results -s microlp -d -m mps"
)]
pub struct Cli {
    /// TOML file with input data
    #[arg(short = 'i', long = "inputs")]
    pub inputs: PathBuf,

    /// Directory where the results are written
    #[arg(short = 'o', long = "output-path")]
    pub output_path: PathBuf,

    /// Solver name (cbc, highs, microlp)
    #[arg(short = 's', long = "solver", default_value = "cbc")]
    pub solver: String,

    /// Debug mode: echo solver output and write the model file
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Format of the debug model file (lp or mps)
    #[arg(short = 'm', long = "model-format", default_value = "lp")]
    pub model_format: ModelFormat,

    /// Emit logs as JSON lines
    #[arg(long = "log-json")]
    pub log_json: bool,
}
