// SPDX-License-Identifier: GPL-3.0-only

//! Single-frame conversion session
//!
//! Runs the whole conversion for one capture:
//!
//! 1. Open the recording
//! 2. Wait for the next capture
//! 3. Read the depth calibration
//! 4. Build the ray table
//! 5. Take the capture's depth image
//! 6. Project it into a point cloud
//!
//! Any failure ends the conversion with no point cloud. The playback handle,
//! capture, images and tables are owned by this call and released on every
//! return path.

use crate::backends::recording::{DirectoryPlayback, Playback};
use crate::constants::timing::CAPTURE_TIMEOUT;
use crate::errors::{ConvertResult, RecordingError};
use crate::pipelines::point_cloud::{PointCloud, build_ray_table, project};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Options for a conversion session
#[derive(Debug, Clone, Copy)]
pub struct ConversionOptions {
    /// Bounded wait for the capture
    pub capture_timeout: Duration,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            capture_timeout: CAPTURE_TIMEOUT,
        }
    }
}

/// Result of converting one capture
#[derive(Debug, Clone)]
pub struct FrameConversion {
    /// Index of the converted capture in the recording
    pub capture_index: u64,
    pub cloud: PointCloud,
    pub valid_point_count: usize,
}

/// Convert the first capture of the recording at `path`
pub fn convert_first_frame(
    path: &Path,
    options: &ConversionOptions,
) -> ConvertResult<FrameConversion> {
    let mut playback =
        DirectoryPlayback::open(path).inspect_err(|e| warn!(error = %e, "Open failed"))?;
    convert_next_capture(&mut playback, options)
}

/// Convert the next capture available from `playback`
pub fn convert_next_capture<P: Playback + ?Sized>(
    playback: &mut P,
    options: &ConversionOptions,
) -> ConvertResult<FrameConversion> {
    let capture = playback
        .next_capture(options.capture_timeout)
        .inspect_err(|e| warn!(error = %e, "No capture"))?;
    debug!(index = capture.index, "Got capture");

    let calibration = playback
        .calibration()
        .inspect_err(|e| warn!(error = %e, "No calibration"))?;
    info!(
        width = calibration.width,
        height = calibration.height,
        "Got playback calibration"
    );

    let ray_table = build_ray_table(&calibration)?;

    let capture_index = capture.index;
    let depth = capture.into_depth_image().ok_or_else(|| {
        warn!(index = capture_index, "Capture has no depth image");
        RecordingError::DepthImageMissing
    })?;
    info!(
        width = depth.width(),
        height = depth.height(),
        "Captured depth image"
    );

    // A depth image in another sensor mode than the calibration cannot be
    // projected through its table
    if depth.len() != ray_table.len() {
        return Err(RecordingError::CaptureReadFailure(format!(
            "depth image is {}x{} but calibration is {}x{}",
            depth.width(),
            depth.height(),
            calibration.width,
            calibration.height
        ))
        .into());
    }

    let (cloud, valid_point_count) = project(&depth, &ray_table);
    info!(
        valid_point_count,
        pixel_count = cloud.len(),
        "Projected point cloud"
    );

    Ok(FrameConversion {
        capture_index,
        cloud,
        valid_point_count,
    })
}
