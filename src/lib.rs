// SPDX-License-Identifier: GPL-3.0-only

//! depthcloud - depth frame to point cloud conversion
//!
//! Reads the first capture of a prerecorded depth camera session and turns
//! its depth image into a 3D point cloud using the sensor calibration.
//!
//! # Architecture
//!
//! - [`calibration`]: sensor intrinsics and pixel back-projection
//! - [`backends`]: recording playback
//! - [`pipelines`]: ray table, projection, export and the conversion session
//! - [`config`]: user configuration handling
//!
//! # Example
//!
//! ```ignore
//! use depthcloud::pipelines::session::{ConversionOptions, convert_first_frame};
//!
//! let conversion = convert_first_frame(path, &ConversionOptions::default())?;
//! println!("{} valid points", conversion.valid_point_count);
//! ```

pub mod backends;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;

// Re-export commonly used types
pub use calibration::{Calibration, Unproject};
pub use config::Config;
pub use errors::{ConvertError, ConvertResult};
pub use pipelines::export::ExportFormat;
pub use pipelines::point_cloud::{Point3, PointCloud, Ray, RayTable};
