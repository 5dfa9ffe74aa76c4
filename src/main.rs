// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use depthcloud::pipelines::export::{ExportFormat, InvalidFill};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "depthcloud")]
#[command(about = "Convert a recorded depth frame into a 3D point cloud")]
#[command(version = depthcloud::constants::app_info::version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the first capture of a recording
    Convert {
        /// Recording directory
        recording: PathBuf,

        /// Output file path (default: ./pointcloud_TIMESTAMP.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (default from config, else ply)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// How long to wait for the first capture, in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Value written for invalid pixels in a dense npy matrix
        #[arg(long, value_enum)]
        invalid_fill: Option<InvalidFill>,

        /// Leave invalid pixels out of the npy matrix
        #[arg(long)]
        compact: bool,
    },

    /// Show the calibration and capture count of a recording
    Info {
        /// Recording directory
        recording: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=depthcloud=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            recording,
            output,
            format,
            timeout_ms,
            invalid_fill,
            compact,
        } => cli::convert_recording(
            &recording,
            output,
            cli::Overrides {
                format,
                timeout_ms,
                invalid_fill,
                compact,
            },
        ),
        Commands::Info { recording } => cli::show_info(&recording),
    }
}
