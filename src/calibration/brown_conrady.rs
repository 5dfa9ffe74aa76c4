// SPDX-License-Identifier: GPL-3.0-only

//! Brown-Conrady lens model with rational radial distortion
//!
//! Depth sensors of the Azure Kinect family ship their factory intrinsics in
//! this form. Distortion is applied to normalized image coordinates taken
//! relative to the distortion center `(codx, cody)`:
//!
//! ```text
//! rs = xp² + yp²
//! d  = (1 + k1·rs + k2·rs² + k3·rs³) / (1 + k4·rs + k5·rs² + k6·rs³)
//! xd = xp·d + (rs + 2xp²)·p2 + 2·xp·yp·p1
//! yd = yp·d + (rs + 2yp²)·p1 + 2·xp·yp·p2
//! ```
//!
//! There is no closed-form inverse, so unprojection runs Gauss-Newton on the
//! analytic Jacobian of the forward model.

use crate::constants::calibration::{
    DEFAULT_METRIC_RADIUS, MAX_REPROJECTION_ERROR_PX, MAX_UNDISTORT_ITERATIONS,
    UNDISTORT_CONVERGENCE,
};
use serde::{Deserialize, Serialize};

/// Intrinsic parameters of the Brown-Conrady model
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrownConradyIntrinsics {
    /// Principal point X (pixels)
    pub cx: f32,
    /// Principal point Y (pixels)
    pub cy: f32,
    /// Focal length X (pixels)
    pub fx: f32,
    /// Focal length Y (pixels)
    pub fy: f32,
    pub k1: f32,
    pub k2: f32,
    pub k3: f32,
    pub k4: f32,
    pub k5: f32,
    pub k6: f32,
    /// Distortion center X (normalized)
    pub codx: f32,
    /// Distortion center Y (normalized)
    pub cody: f32,
    /// Tangential coefficient
    pub p1: f32,
    /// Tangential coefficient
    pub p2: f32,
    /// Radius of the calibrated region on the normalized plane, 0 if unknown
    pub metric_radius: f32,
}

/// Distorted point plus the 2x2 Jacobian `d(xd, yd) / d(xp, yp)`
struct Distortion {
    xd: f64,
    yd: f64,
    jacobian: [[f64; 2]; 2],
}

impl BrownConradyIntrinsics {
    fn max_radius_squared(&self) -> f64 {
        let radius = if self.metric_radius > 0.0 {
            self.metric_radius
        } else {
            DEFAULT_METRIC_RADIUS
        } as f64;
        radius * radius
    }

    /// Forward distortion of a point relative to the distortion center
    fn distort(&self, xp: f64, yp: f64) -> Option<Distortion> {
        let (k1, k2, k3) = (self.k1 as f64, self.k2 as f64, self.k3 as f64);
        let (k4, k5, k6) = (self.k4 as f64, self.k5 as f64, self.k6 as f64);
        let (p1, p2) = (self.p1 as f64, self.p2 as f64);

        let xp2 = xp * xp;
        let yp2 = yp * yp;
        let xyp = xp * yp;
        let rs = xp2 + yp2;

        let a = 1.0 + rs * (k1 + rs * (k2 + rs * k3));
        let b = 1.0 + rs * (k4 + rs * (k5 + rs * k6));
        if b.abs() < f64::EPSILON {
            return None;
        }
        let d = a / b;

        // d(d)/d(rs)
        let da = k1 + rs * (2.0 * k2 + 3.0 * rs * k3);
        let db = k4 + rs * (2.0 * k5 + 3.0 * rs * k6);
        let dd = (da * b - a * db) / (b * b);

        let xd = xp * d + (rs + 2.0 * xp2) * p2 + 2.0 * xyp * p1;
        let yd = yp * d + (rs + 2.0 * yp2) * p1 + 2.0 * xyp * p2;

        let dxd_dxp = d + 2.0 * xp2 * dd + 6.0 * xp * p2 + 2.0 * yp * p1;
        let dxd_dyp = 2.0 * xyp * dd + 2.0 * yp * p2 + 2.0 * xp * p1;
        let dyd_dxp = 2.0 * xyp * dd + 2.0 * xp * p1 + 2.0 * yp * p2;
        let dyd_dyp = d + 2.0 * yp2 * dd + 6.0 * yp * p1 + 2.0 * xp * p2;

        Some(Distortion {
            xd,
            yd,
            jacobian: [[dxd_dxp, dxd_dyp], [dyd_dxp, dyd_dyp]],
        })
    }

    /// Project a camera-space point to pixel coordinates
    ///
    /// Returns `None` for points behind the camera or outside the calibrated
    /// radius.
    pub fn project(&self, point: [f32; 3]) -> Option<[f32; 2]> {
        let z = point[2] as f64;
        if z <= 0.0 {
            return None;
        }

        let xp = point[0] as f64 / z - self.codx as f64;
        let yp = point[1] as f64 / z - self.cody as f64;
        if xp * xp + yp * yp > self.max_radius_squared() {
            return None;
        }

        let distortion = self.distort(xp, yp)?;
        let u = (distortion.xd + self.codx as f64) * self.fx as f64 + self.cx as f64;
        let v = (distortion.yd + self.cody as f64) * self.fy as f64 + self.cy as f64;
        Some([u as f32, v as f32])
    }

    /// Back-project a pixel at the given depth
    ///
    /// Returns `None` when the solver leaves the calibrated radius, fails to
    /// converge, or the depth is not positive.
    pub fn unproject(&self, pixel: [f32; 2], depth: f32) -> Option<[f32; 3]> {
        if depth <= 0.0 {
            return None;
        }

        let (fx, fy) = (self.fx as f64, self.fy as f64);
        let (codx, cody) = (self.codx as f64, self.cody as f64);

        let target_x = (pixel[0] as f64 - self.cx as f64) / fx - codx;
        let target_y = (pixel[1] as f64 - self.cy as f64) / fy - cody;

        let mut xp = target_x;
        let mut yp = target_y;

        for _ in 0..MAX_UNDISTORT_ITERATIONS {
            let distortion = self.distort(xp, yp)?;
            let rx = distortion.xd - target_x;
            let ry = distortion.yd - target_y;
            if rx * rx + ry * ry < UNDISTORT_CONVERGENCE {
                break;
            }

            let [[a, b], [c, d]] = distortion.jacobian;
            let det = a * d - b * c;
            if det.abs() < f64::EPSILON {
                return None;
            }
            xp -= (d * rx - b * ry) / det;
            yp -= (a * ry - c * rx) / det;
        }

        if !xp.is_finite() || !yp.is_finite() || xp * xp + yp * yp > self.max_radius_squared() {
            return None;
        }

        let distortion = self.distort(xp, yp)?;
        let error_x = (distortion.xd - target_x) * fx;
        let error_y = (distortion.yd - target_y) * fy;
        if (error_x * error_x + error_y * error_y).sqrt() > MAX_REPROJECTION_ERROR_PX {
            return None;
        }

        let depth = depth as f64;
        Some([
            ((xp + codx) * depth) as f32,
            ((yp + cody) * depth) as f32,
            depth as f32,
        ])
    }
}
