//! ferry-world-sim binary
//!
//! Runs the simulation headlessly. With `--advance-seconds` the run is a
//! deterministic fixed-step advance that prints the final JSON snapshot and
//! its digest; otherwise the tokio frame driver runs until Ctrl-C or
//! `--ticks` frames.
//!
//! ## Configuration (env / TOML via `config` crate)
//!
//! | Key                             | Default | Description                     |
//! |---------------------------------|---------|---------------------------------|
//! | `FERRY_SIM__SEED`               | `42`    | Seed for layout and agents      |
//! | `FERRY_SIM__DAY_LENGTH`         | `300`   | Seconds per day-night cycle     |
//! | `FERRY_SIM__TOTAL_COLLECTIBLES` | `8`     | Collectibles and delivery slots |
//! | `FERRY_SIM__TICK_RATE_HZ`       | `60`    | Driver frame rate               |
//! | `FERRY_SETTINGS__VIEW_DISTANCE` | `500`   | Fog far distance                |
//! | `FERRY_SETTINGS__SHADOWS`       | `true`  | Sun casts shadows               |

use anyhow::{Context, Result};
use clap::Parser;
use ferry_world::{
    driver::{DriverConfig, SimDriver},
    settings,
    service::SimulationService,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "ferry-world-sim", about = "Ferry World headless simulation", version)]
struct Args {
    /// Optional TOML config file
    #[arg(long, env = "FERRY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured seed
    #[arg(long, env = "FERRY_SEED")]
    seed: Option<u64>,

    /// Override the configured frame rate (Hz)
    #[arg(long, env = "FERRY_TICK_RATE_HZ")]
    tick_rate_hz: Option<f32>,

    /// Stop the driver after this many frames
    #[arg(long)]
    ticks: Option<u64>,

    /// Advance this many seconds in fixed steps, print the snapshot and exit
    #[arg(long)]
    advance_seconds: Option<f64>,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ferry_world=debug".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut loaded = settings::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(seed) = args.seed {
        loaded.sim.seed = seed;
    }
    if let Some(hz) = args.tick_rate_hz {
        loaded.sim.tick_rate_hz = hz;
    }
    loaded.validate().context("Invalid configuration")?;

    log::info!(
        "Starting ferry-world-sim (seed={}, day_length={}s, collectibles={})",
        loaded.sim.seed,
        loaded.sim.day_length,
        loaded.sim.total_collectibles,
    );

    let tick_rate_hz = loaded.sim.tick_rate_hz;
    let mut service = SimulationService::new(loaded.sim, loaded.settings);
    service.reset();

    if let Some(seconds) = args.advance_seconds {
        let feedback = service.advance(Duration::from_secs_f64(seconds.max(0.0)));
        for fb in &feedback {
            log::info!("{}", fb);
        }
        println!("{}", service.snapshot_json().context("Failed to serialise snapshot")?);
        println!("digest {}", service.snapshot_digest()?);
        return Ok(());
    }

    let service = Arc::new(Mutex::new(service));
    let driver_config = DriverConfig {
        tick_rate_hz,
        max_ticks: args.ticks,
    };
    let (driver, _handle) = SimDriver::new(driver_config, service.clone());
    let ticks = driver.run().await?;

    let stats = service.lock().stats();
    log::info!(
        "Stopped after {} frames ({:.1}s simulated, {} boat trips, {} sky rebuilds)",
        ticks,
        stats.elapsed_seconds,
        stats.boat_trips,
        stats.sky_regenerations
    );
    Ok(())
}
