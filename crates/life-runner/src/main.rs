//! Headless driver for the Life Engine simulation.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;
use life_core::Stats;
use life_runner::{cli, telemetry, Scheduler, SchedulerOptions};
use life_world::Simulation;
use serde::Serialize;
use tokio::signal;
use tracing::{debug, info};

/// Printed to stdout when the run ends
#[derive(Serialize)]
struct RunReport {
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    grid_size: i32,
    land_cells: usize,
    peak_population: usize,
    stats: Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    telemetry::init_telemetry(args.log_json)?;

    let config = args.to_config();
    info!(
        grid_size = config.world.grid_size,
        food = config.food.spawn_target,
        ticks_per_second = config.ticks_per_second,
        seed = ?config.seed,
        "Starting Life Engine"
    );

    let simulation = Simulation::new(config)?;
    let options = SchedulerOptions {
        start_running: true,
        max_ticks: args.ticks,
        log_every: args.log_every,
    };
    let (scheduler, handle) = Scheduler::new(simulation, options);

    let started_at = Utc::now();
    let mut run = tokio::spawn(scheduler.run());

    let world = tokio::select! {
        world = &mut run => world?,
        _ = shutdown_signal() => {
            if let Err(e) = handle.shutdown() {
                debug!("Scheduler already stopped: {}", e);
            }
            run.await?
        }
    };

    let report = RunReport {
        started_at,
        finished_at: Utc::now(),
        grid_size: world.size(),
        land_cells: world.terrain.land_cells(),
        peak_population: world.stats.history.peak_population(),
        stats: world.stats.clone(),
    };

    info!(
        event = "run_summary",
        ticks = report.stats.step,
        population = report.stats.organism_count,
        food = report.stats.food_count,
        "Run complete"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
