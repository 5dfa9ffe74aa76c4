// SPDX-License-Identifier: GPL-3.0-only

//! Depth-to-point-cloud conversion
//!
//! Conversion is split in two stages:
//! - [`build_ray_table`] runs once per calibration and stores the unit ray of
//!   every depth pixel
//! - [`project`] runs once per depth frame and scales each ray by its depth
//!
//! Invalid pixels are carried as `None` at their original index in both the
//! ray table and the point cloud, so every buffer shares the depth frame's
//! raster indexing.

mod projector;
mod ray_table;

pub use projector::project;
pub use ray_table::{RayTable, build_ray_table};

/// Camera-space direction of a pixel at unit depth (`z == 1`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub x: f32,
    pub y: f32,
}

/// Camera-space point, in the units of the depth samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Dense per-pixel point cloud of one depth frame
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    width: u32,
    height: u32,
    points: Vec<Option<Point3>>,
    valid_point_count: usize,
}

impl PointCloud {
    pub(crate) fn new(width: u32, height: u32, points: Vec<Option<Point3>>) -> Self {
        let valid_point_count = points.iter().filter(|p| p.is_some()).count();
        Self {
            width,
            height,
            points,
            valid_point_count,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Per-pixel points in raster order, `None` for invalid pixels
    pub fn points(&self) -> &[Option<Point3>] {
        &self.points
    }

    /// Number of pixels, valid or not
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn valid_point_count(&self) -> usize {
        self.valid_point_count
    }

    /// Valid points in raster order, skipping invalid pixels
    pub fn valid_points(&self) -> impl Iterator<Item = &Point3> + '_ {
        self.points.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_points_skip_sentinels() {
        let cloud = PointCloud::new(
            3,
            1,
            vec![
                None,
                Some(Point3 {
                    x: 1.0,
                    y: 2.0,
                    z: 3.0,
                }),
                None,
            ],
        );
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.valid_point_count(), 1);
        assert_eq!(cloud.valid_points().count(), 1);
    }
}
