// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for recording conversion
//!
//! This module provides command-line functionality for:
//! - Converting the first capture of a recording into a point cloud
//! - Inspecting a recording

use chrono::Local;
use depthcloud::Config;
use depthcloud::backends::recording::{DirectoryPlayback, Playback};
use depthcloud::calibration::LensModel;
use depthcloud::constants::export::DEFAULT_FILE_STEM;
use depthcloud::pipelines::export::{ExportFormat, InvalidFill, export_point_cloud};
use depthcloud::pipelines::session::convert_first_frame;
use std::path::{Path, PathBuf};

/// Command-line values that take precedence over the config file
pub struct Overrides {
    pub format: Option<ExportFormat>,
    pub timeout_ms: Option<u64>,
    pub invalid_fill: Option<InvalidFill>,
    pub compact: bool,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(format) = self.format {
            config.export_format = format;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.capture_timeout_ms = timeout_ms;
        }
        if let Some(fill) = self.invalid_fill {
            config.invalid_fill = fill;
        }
        if self.compact {
            config.compact_matrix = true;
        }
    }
}

/// Convert the first capture of `recording` and write it to disk
pub fn convert_recording(
    recording: &Path,
    output: Option<PathBuf>,
    overrides: Overrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load();
    overrides.apply(&mut config);

    let format = config.export_format;
    let output_path = output.unwrap_or_else(|| default_output_path(format));

    println!("Recording: {}", recording.display());
    let conversion = convert_first_frame(recording, &config.conversion_options())?;

    println!(
        "Capture {}: {}x{} depth image, {} valid points",
        conversion.capture_index,
        conversion.cloud.width(),
        conversion.cloud.height(),
        conversion.valid_point_count
    );

    export_point_cloud(
        &conversion.cloud,
        format,
        config.matrix_layout(),
        &output_path,
    )?;

    println!("Point cloud saved: {}", output_path.display());
    Ok(())
}

/// Print the calibration and capture count of `recording`
pub fn show_info(recording: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let playback = DirectoryPlayback::open(recording)?;

    println!("Recording: {}", playback.path().display());
    println!("Captures: {}", playback.capture_count()?);
    println!();

    match playback.calibration() {
        Ok(calibration) => {
            println!("Depth calibration:");
            println!("  Resolution: {}x{}", calibration.width, calibration.height);
            match calibration.lens {
                LensModel::Pinhole(p) => {
                    println!("  Model: pinhole");
                    println!("  Focal length: fx={} fy={}", p.fx, p.fy);
                    println!("  Principal point: cx={} cy={}", p.cx, p.cy);
                }
                LensModel::BrownConrady(bc) => {
                    println!("  Model: brown-conrady (rational)");
                    println!("  Focal length: fx={} fy={}", bc.fx, bc.fy);
                    println!("  Principal point: cx={} cy={}", bc.cx, bc.cy);
                    println!(
                        "  Radial: k1={} k2={} k3={} k4={} k5={} k6={}",
                        bc.k1, bc.k2, bc.k3, bc.k4, bc.k5, bc.k6
                    );
                    println!("  Tangential: p1={} p2={}", bc.p1, bc.p2);
                    println!("  Metric radius: {}", bc.metric_radius);
                }
            }
        }
        Err(e) => println!("Depth calibration: unavailable ({})", e),
    }

    Ok(())
}

fn default_output_path(format: ExportFormat) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!(
        "{}_{}.{}",
        DEFAULT_FILE_STEM,
        timestamp,
        format.extension()
    ))
}
