// SPDX-License-Identifier: GPL-3.0-only

//! Depth sensor calibration
//!
//! A [`Calibration`] describes how the depth sensor's pixel grid maps to rays
//! in camera space. The ray table builder only sees it through [`Unproject`],
//! the per-pixel back-projection routine.

mod brown_conrady;

pub use brown_conrady::BrownConradyIntrinsics;

use crate::errors::{CalibrationError, RecordingError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Per-pixel geometric back-projection for one sensor at one resolution
pub trait Unproject {
    /// Sensor resolution as (width, height)
    fn resolution(&self) -> (u32, u32);

    /// Back-project a pixel at `depth` into the sensor's own camera space
    ///
    /// Returns `None` when the pixel lies outside the calibrated field of view
    /// or the geometry is degenerate.
    fn unproject(&self, pixel: [f32; 2], depth: f32) -> Option<[f32; 3]>;

    /// Reject parameters that cannot describe a sensor
    fn validate(&self) -> Result<(), CalibrationError> {
        let (width, height) = self.resolution();
        check_resolution(width, height)
    }
}

fn check_resolution(width: u32, height: u32) -> Result<(), CalibrationError> {
    if width == 0 || height == 0 {
        return Err(CalibrationError::InvalidCalibration(format!(
            "resolution {}x{} has no pixels",
            width, height
        )));
    }
    Ok(())
}

/// Pinhole intrinsics without distortion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinholeIntrinsics {
    pub cx: f32,
    pub cy: f32,
    pub fx: f32,
    pub fy: f32,
}

/// Lens model of the depth sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LensModel {
    Pinhole(PinholeIntrinsics),
    BrownConrady(BrownConradyIntrinsics),
}

impl LensModel {
    fn focal_lengths(&self) -> (f32, f32) {
        match self {
            LensModel::Pinhole(p) => (p.fx, p.fy),
            LensModel::BrownConrady(bc) => (bc.fx, bc.fy),
        }
    }
}

/// Depth camera calibration at one resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub width: u32,
    pub height: u32,
    pub lens: LensModel,
}

impl Calibration {
    /// Load a calibration from a JSON file
    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RecordingError::CalibrationUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let calibration: Calibration = serde_json::from_str(&contents).map_err(|e| {
            RecordingError::CalibrationUnavailable(format!("{}: {}", path.display(), e))
        })?;

        debug!(
            path = %path.display(),
            width = calibration.width,
            height = calibration.height,
            lens = ?calibration.lens,
            "Loaded calibration"
        );

        Ok(calibration)
    }

    /// Number of pixels in the depth image
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Unproject for Calibration {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn unproject(&self, pixel: [f32; 2], depth: f32) -> Option<[f32; 3]> {
        match &self.lens {
            LensModel::Pinhole(p) => {
                if depth <= 0.0 {
                    return None;
                }
                Some([
                    (pixel[0] - p.cx) / p.fx * depth,
                    (pixel[1] - p.cy) / p.fy * depth,
                    depth,
                ])
            }
            LensModel::BrownConrady(bc) => bc.unproject(pixel, depth),
        }
    }

    fn validate(&self) -> Result<(), CalibrationError> {
        check_resolution(self.width, self.height)?;

        let (fx, fy) = self.lens.focal_lengths();
        if !fx.is_finite() || !fy.is_finite() || fx == 0.0 || fy == 0.0 {
            return Err(CalibrationError::InvalidCalibration(format!(
                "focal length ({}, {}) is not usable",
                fx, fy
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinhole_640x480() -> Calibration {
        Calibration {
            width: 640,
            height: 480,
            lens: LensModel::Pinhole(PinholeIntrinsics {
                cx: 319.5,
                cy: 239.5,
                fx: 580.0,
                fy: 580.0,
            }),
        }
    }

    #[test]
    fn test_pinhole_calibration_is_valid() {
        let calibration = pinhole_640x480();
        assert!(calibration.validate().is_ok());
        assert_eq!(calibration.pixel_count(), 640 * 480);
    }

    #[test]
    fn test_pinhole_unproject() {
        let calibration = Calibration {
            width: 4,
            height: 4,
            lens: LensModel::Pinhole(PinholeIntrinsics {
                cx: 2.0,
                cy: 2.0,
                fx: 10.0,
                fy: 20.0,
            }),
        };
        assert_eq!(calibration.unproject([3.0, 0.0], 1.0), Some([0.1, -0.1, 1.0]));
        assert_eq!(calibration.unproject([3.0, 0.0], 0.0), None);
    }

    #[test]
    fn test_zero_resolution_is_invalid() {
        let calibration = Calibration {
            width: 0,
            ..pinhole_640x480()
        };
        assert!(matches!(
            calibration.validate(),
            Err(CalibrationError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn test_zero_focal_length_is_invalid() {
        let calibration = Calibration {
            width: 640,
            height: 576,
            lens: LensModel::BrownConrady(BrownConradyIntrinsics::default()),
        };
        assert!(calibration.validate().is_err());
    }

    #[test]
    fn test_json_lens_model_tag() {
        let json = r#"{
            "width": 640,
            "height": 576,
            "lens": { "model": "brown_conrady", "cx": 319.5, "cy": 325.3, "fx": 504.2, "fy": 504.3, "k1": 0.5 }
        }"#;
        let calibration: Calibration = serde_json::from_str(json).unwrap();
        match calibration.lens {
            LensModel::BrownConrady(bc) => {
                assert_eq!(bc.k1, 0.5);
                assert_eq!(bc.k2, 0.0);
                assert_eq!(bc.metric_radius, 0.0);
            }
            other => panic!("unexpected lens model {:?}", other),
        }
    }
}
