//! Glidecursor CLI — pointer trace generation, replay, and analysis.
//!
//! Usage:
//!   glidecursor synth [OPTIONS]      Generate a synthetic pointer trace
//!   glidecursor replay <TRACE>       Run the follower over a trace
//!   glidecursor drift <TRACE>        Report lag and convergence statistics

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glidecursor_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "glidecursor",
    about = "Smoothed cursor-follower engine tooling",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic pointer trace touring the viewport
    Synth {
        /// Output trace path
        #[arg(short, long, default_value = "trace.jsonl")]
        output: PathBuf,

        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: f64,

        /// Viewport height in pixels
        #[arg(long, default_value = "720")]
        height: f64,

        /// Pointer sample rate (Hz)
        #[arg(long, default_value = "60")]
        sample_rate: u32,

        /// Dwell time at each waypoint (milliseconds)
        #[arg(long, default_value = "400")]
        dwell_ms: u64,

        /// Travel time between waypoints (milliseconds)
        #[arg(long, default_value = "500")]
        travel_ms: u64,

        /// Emit a primary-button click at each waypoint
        #[arg(long)]
        clicks: bool,
    },

    /// Replay a trace through the follower and write the smoothed path
    Replay {
        /// Path to the input trace (JSONL)
        trace: PathBuf,

        /// Output path for the smoothed trace (defaults next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Element tree JSON for hover resolution
        #[arg(long)]
        nodes: Option<PathBuf>,

        /// Virtual frame rate (Hz)
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Smoothing factor override (defaults to the configured value)
        #[arg(long)]
        factor: Option<f64>,

        /// Interactive selector override
        #[arg(long)]
        selector: Option<String>,

        /// Settle frames to run after the last event
        #[arg(long, default_value = "120")]
        tail: u32,
    },

    /// Report lag and convergence statistics for a trace
    Drift {
        /// Path to the input trace (JSONL)
        trace: PathBuf,

        /// Virtual frame rate (Hz)
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Smoothing factor override (defaults to the configured value)
        #[arg(long)]
        factor: Option<f64>,

        /// Convergence epsilon in pixels
        #[arg(long, default_value = "0.5")]
        epsilon: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    glidecursor_common::logging::init_logging(&glidecursor_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    let config = AppConfig::load();

    match cli.command {
        Commands::Synth {
            output,
            width,
            height,
            sample_rate,
            dwell_ms,
            travel_ms,
            clicks,
        } => commands::synth::run(output, width, height, sample_rate, dwell_ms, travel_ms, clicks),
        Commands::Replay {
            trace,
            output,
            nodes,
            fps,
            factor,
            selector,
            tail,
        } => commands::replay::run(
            trace,
            output,
            nodes,
            fps,
            factor.unwrap_or(config.follower.smoothing_factor),
            selector.unwrap_or_else(|| config.follower.interactive_selector.clone()),
            tail,
        ),
        Commands::Drift {
            trace,
            fps,
            factor,
            epsilon,
        } => commands::drift::run(
            trace,
            fps,
            factor.unwrap_or(config.follower.smoothing_factor),
            epsilon,
        ),
    }
}
