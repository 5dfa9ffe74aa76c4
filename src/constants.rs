// SPDX-License-Identifier: GPL-3.0-only

//! Crate-wide constants

use std::time::Duration;

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Bounded wait for the next capture of a recording
    pub const CAPTURE_TIMEOUT: Duration = Duration::from_millis(1000);

    /// Interval between checks for a capture that has not landed yet
    pub const CAPTURE_POLL_INTERVAL: Duration = Duration::from_millis(16);
}

/// On-disk layout of a recording directory
///
/// ```text
/// recording/
///   calibration.json
///   000000.depth.png     16-bit grayscale, millimeters
///   000000.color.jpg     optional, presence only
///   000001.depth.raw     little-endian u16, sized from the calibration
/// ```
pub mod recording {
    /// Depth sensor calibration file name
    pub const CALIBRATION_FILE: &str = "calibration.json";

    /// Image kind tag for depth images
    pub const DEPTH_KIND: &str = "depth";
    /// Image kind tag for color images
    pub const COLOR_KIND: &str = "color";
    /// Image kind tag for infrared images
    pub const IR_KIND: &str = "ir";

    /// Depth image stored as 16-bit PNG
    pub const DEPTH_PNG_EXTENSION: &str = "png";
    /// Depth image stored as headerless little-endian u16 samples
    pub const DEPTH_RAW_EXTENSION: &str = "raw";
}

/// Depth-camera geometry constants
pub mod calibration {
    /// Valid radius of the normalized image plane when a calibration carries none
    pub const DEFAULT_METRIC_RADIUS: f32 = 1.7;

    /// Gauss-Newton iteration cap for undistortion
    pub const MAX_UNDISTORT_ITERATIONS: usize = 20;

    /// Squared normalized residual at which undistortion stops early
    pub const UNDISTORT_CONVERGENCE: f64 = 1e-16;

    /// Largest re-projection error (pixels) for a ray to count as valid
    pub const MAX_REPROJECTION_ERROR_PX: f64 = 0.5;
}

/// Export constants
pub mod export {
    /// File stem for generated output names
    pub const DEFAULT_FILE_STEM: &str = "pointcloud";

    /// Depth samples are millimeters; LAS coordinates are meters
    pub const MILLIMETERS_PER_METER: f64 = 1000.0;

    /// LAS coordinate quantization (1 mm)
    pub const LAS_SCALE: f64 = 0.001;
}

/// Application info
pub mod app_info {
    /// Directory name under the user config dir
    pub const CONFIG_DIR_NAME: &str = "depthcloud";

    /// Config file name inside [`CONFIG_DIR_NAME`]
    pub const CONFIG_FILE_NAME: &str = "config.json";

    /// Version string embedded by the build script
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_interval_fits_in_timeout() {
        assert!(timing::CAPTURE_POLL_INTERVAL < timing::CAPTURE_TIMEOUT);
    }
}
