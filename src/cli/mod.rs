//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod info;
mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

pub use info::EffectsAction;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Snowglobe - holiday particle backdrops
#[derive(Parser)]
#[command(name = "snowglobe")]
#[command(about = "Snowglobe - simulate holiday particle backdrops and export them as GIF or PNG")]
#[command(version)]
pub struct Cli {
    /// Log engine activity (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate an effect and write it as an animated GIF
    Render {
        /// Output file or directory.
        /// If omitted: snowglobe_{effect}.gif
        /// If directory (ends with /): dir/{effect}.gif
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Effect shown from the first frame (winter, classic, warm)
        #[arg(short, long)]
        effect: Option<String>,

        /// Number of frames to simulate
        #[arg(long)]
        frames: Option<u32>,

        /// Canvas size as WIDTHxHEIGHT (e.g. 640x360)
        #[arg(long)]
        size: Option<String>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Display time of each GIF frame in milliseconds
        #[arg(long)]
        frame_ms: Option<u32>,

        /// Background color (any CSS color)
        #[arg(long)]
        background: Option<String>,

        /// Switch effect before a frame, as FRAME:EFFECT (repeatable)
        #[arg(long = "switch", value_name = "FRAME:EFFECT")]
        switches: Vec<String>,

        /// Write only the final frame as PNG
        #[arg(long)]
        png: bool,

        /// Path to snowglobe.toml (default: discovered from the working directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Inspect the built-in effects
    Effects {
        #[command(subcommand)]
        action: EffectsAction,
    },

    /// Print the placement table of an overlay layer as JSON
    Overlay {
        /// Overlay kind (stars, confetti, embers)
        kind: String,

        /// Seed for reproducible placement
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print how many bulbs a string of lights needs for a width
    Lights {
        /// Width to span, in pixels
        #[arg(long)]
        width: f64,
    },
}

/// Install the stderr logger. `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            output,
            effect,
            frames,
            size,
            seed,
            frame_ms,
            background,
            switches,
            png,
            config,
        } => render::run_render(render::RenderArgs {
            output: output.as_deref(),
            effect: effect.as_deref(),
            frames,
            size: size.as_deref(),
            seed,
            frame_ms,
            background: background.as_deref(),
            switches: &switches,
            png,
            config: config.as_deref(),
        }),
        Commands::Effects { action } => info::run_effects(action),
        Commands::Overlay { kind, seed } => info::run_overlay(&kind, seed),
        Commands::Lights { width } => info::run_lights(width),
    }
}
