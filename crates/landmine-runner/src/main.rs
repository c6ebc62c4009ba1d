//! Headless driver for the landmine sweep simulation.

mod settings;
mod telemetry;

use anyhow::{Context, Result};
use landmine_core::RunnerConfig;
use landmine_world::{render_ascii, Simulation};
use tracing::{error, info};

fn main() -> Result<()> {
    telemetry::init_logging()?;

    let config = settings::load()?;
    info!(
        seed = config.sim.seed,
        grid_size = config.sim.world.grid_size,
        landmines = config.sim.world.landmine_count,
        max_ticks = config.max_ticks,
        "Starting landmine sweep"
    );

    if let Err(e) = run(&config) {
        error!("Simulation failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}

fn run(config: &RunnerConfig) -> Result<()> {
    let mut sim = Simulation::new(config.sim.clone())?;

    let report_every = config.report_every;
    let result = sim
        .run_with(config.max_ticks, |sim, report| {
            if report_every > 0 && report.tick % report_every == 0 {
                info!(tick = report.tick, "\n{}", sim.details());
            }
        })
        .with_context(|| format!("simulation aborted after tick {}", sim.tick()))?;

    if config.print_map {
        println!("{}", render_ascii(sim.grid()));
        println!("{}", sim.details());
    }

    if let Some(path) = &config.result_path {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, json).with_context(|| format!("writing result to {path}"))?;
        info!(path = %path, "Result written");
    }

    Ok(())
}
