// SPDX-License-Identifier: GPL-3.0-only

//! Per-pixel unit ray lookup table

use super::Ray;
use crate::calibration::Unproject;
use crate::errors::CalibrationError;
use tracing::debug;

/// Unit rays of every depth pixel in raster order, `None` where the pixel
/// falls outside the calibrated field of view
///
/// Built once per calibration and reused for every frame that shares it.
#[derive(Debug, Clone, PartialEq)]
pub struct RayTable {
    width: u32,
    height: u32,
    rays: Vec<Option<Ray>>,
}

impl RayTable {
    /// Build a table from precomputed rays
    pub fn from_rays(
        width: u32,
        height: u32,
        rays: Vec<Option<Ray>>,
    ) -> Result<Self, CalibrationError> {
        let expected = width as usize * height as usize;
        if expected == 0 || rays.len() != expected {
            return Err(CalibrationError::InvalidCalibration(format!(
                "{} rays for a {}x{} table",
                rays.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            rays,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rays(&self) -> &[Option<Ray>] {
        &self.rays
    }

    pub fn len(&self) -> usize {
        self.rays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    /// Number of pixels with a valid ray
    pub fn valid_ray_count(&self) -> usize {
        self.rays.iter().filter(|r| r.is_some()).count()
    }
}

/// Back-project every pixel at unit depth
///
/// The `z` of each ray is 1 by construction and is not stored. Pixels the
/// calibration rejects, or that come back non-finite, get `None`.
pub fn build_ray_table<U: Unproject + ?Sized>(calibration: &U) -> Result<RayTable, CalibrationError> {
    calibration.validate()?;
    let (width, height) = calibration.resolution();

    let mut rays = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let ray = calibration
                .unproject([x as f32, y as f32], 1.0)
                .filter(|r| r[0].is_finite() && r[1].is_finite())
                .map(|r| Ray { x: r[0], y: r[1] });
            rays.push(ray);
        }
    }

    let table = RayTable::from_rays(width, height, rays)?;
    debug!(
        width,
        height,
        valid_rays = table.valid_ray_count(),
        "Built ray table"
    );

    Ok(table)
}
