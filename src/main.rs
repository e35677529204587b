use anyhow::{Context, Result};
use clap::Parser;
use heat_scheduler::{cli, config, optimizer, output, simulation, telemetry};
use cli::Cli;
use config::Configuration;
use optimizer::SolverType;
use simulation::{SimulationOptions, Simulator};
use tracing::{info, warn};

fn main() -> Result<()> {
    let args = Cli::parse();
    telemetry::init_tracing(args.log_json);

    info!("Simulation of heating a building...");

    let solver = SolverType::resolve(&args.solver)?;

    std::fs::create_dir_all(&args.output_path).with_context(|| {
        format!(
            "Failed to create output directory {}",
            args.output_path.display()
        )
    })?;

    let cfg = Configuration::load(&args.inputs)
        .with_context(|| format!("Failed to load inputs from {}", args.inputs.display()))?;

    let options = SimulationOptions {
        solver,
        debug: args.debug,
        model_format: args.model_format,
        output_path: Some(args.output_path.clone()),
    };
    let outcome = Simulator::new(&cfg, options).run()?;

    let written = output::write_results(&outcome.result, &args.output_path)?;
    info!(files = written.len(), "results saved");

    let charts = output::render_all(&cfg, &outcome.series, &outcome.result, &args.output_path);
    if charts.len() < 4 {
        warn!(rendered = charts.len(), "some charts were not rendered");
    }

    info!(
        objective = outcome.result.objective_function,
        output = %args.output_path.display(),
        "done"
    );
    Ok(())
}
