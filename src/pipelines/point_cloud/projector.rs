// SPDX-License-Identifier: GPL-3.0-only

//! Depth frame projection through a ray table

use super::{Point3, PointCloud, RayTable};
use crate::backends::recording::DepthFrame;

/// Scale every valid ray by its depth sample
///
/// A pixel yields `(ray.x * d, ray.y * d, d)` when its depth `d` is non-zero
/// and its ray is valid, and `None` otherwise. The output stays dense: it has
/// one entry per pixel, at the pixel's index. Returns the cloud together with
/// its valid point count.
///
/// # Panics
///
/// Panics if the frame and the table differ in length. Both must come from
/// the same sensor mode.
pub fn project(depth_frame: &DepthFrame, ray_table: &RayTable) -> (PointCloud, usize) {
    assert_eq!(
        depth_frame.len(),
        ray_table.len(),
        "depth frame {}x{} does not match ray table {}x{}",
        depth_frame.width(),
        depth_frame.height(),
        ray_table.width(),
        ray_table.height()
    );

    let points: Vec<Option<Point3>> = depth_frame
        .samples()
        .iter()
        .zip(ray_table.rays())
        .map(|(&depth, ray)| match ray {
            Some(ray) if depth != 0 => {
                let d = depth as f32;
                Some(Point3 {
                    x: ray.x * d,
                    y: ray.y * d,
                    z: d,
                })
            }
            _ => None,
        })
        .collect();

    let cloud = PointCloud::new(ray_table.width(), ray_table.height(), points);
    let count = cloud.valid_point_count();
    (cloud, count)
}
