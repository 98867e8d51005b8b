//! LakeSim event detection stage
//!
//! Scans post-processed lake simulation output for physical events such as
//! upwelling and localised currents, writing them to `events.json` in the
//! simulation folder.

use anyhow::Result;
use clap::Parser;
use lakesim_events::config::DEFAULT_IMAGE;
use lakesim_events::{run_stage, StageOptions, StageOutcome};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lakesim-events")]
#[command(about = "Detect events in lake simulation output", long_about = None)]
struct Cli {
    /// Simulation folder
    #[arg(short, long)]
    folder: PathBuf,

    /// Docker image that produced the simulation
    #[arg(short, long, default_value = DEFAULT_IMAGE)]
    docker: String,

    /// Verify surface temperature before detecting events
    #[arg(long)]
    verify: bool,

    /// Output file name (default: events.json in the simulation folder)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    describe_metrics();

    info!("Starting event detection for {}", cli.folder.display());

    let options = StageOptions {
        folder: cli.folder,
        docker: cli.docker,
        verify: cli.verify,
        output: cli.output,
    };

    match run_stage(&options)? {
        StageOutcome::Skipped => info!("Event detection skipped"),
        StageOutcome::Written { path, events } => {
            info!("Event detection complete: {} events in {}", events, path.display())
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("lakesim=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lakesim=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Register metric descriptions for hosts that install a recorder
fn describe_metrics() {
    metrics::describe_counter!(
        "lakesim_frames_classified_total",
        "Total number of frames classified by detector type"
    );
    metrics::describe_counter!(
        "lakesim_events_total",
        "Total number of events detected by detector type"
    );
}
