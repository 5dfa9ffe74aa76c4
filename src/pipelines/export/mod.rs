// SPDX-License-Identifier: GPL-3.0-only

//! Point cloud export
//!
//! Exporters for a converted depth frame:
//! - ASCII PLY with the valid points only
//! - LAS with the valid points only, in meters
//! - `.npy` vertex matrix for numeric hosts

mod las_export;
mod matrix;
mod ply_export;

pub use las_export::save_las;
pub use matrix::{InvalidFill, MatrixLayout, save_npy, to_vertex_matrix};
pub use ply_export::{save_ply, write_ply};

use crate::errors::ExportError;
use crate::pipelines::point_cloud::PointCloud;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output file format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// ASCII PLY point list
    #[default]
    Ply,
    /// LAS 1.4 point list
    Las,
    /// 3 x N vertex matrix
    Npy,
}

impl ExportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Ply => "ply",
            ExportFormat::Las => "las",
            ExportFormat::Npy => "npy",
        }
    }
}

/// Write `cloud` to `output_path` in `format`
///
/// `layout` only applies to the matrix format.
pub fn export_point_cloud(
    cloud: &PointCloud,
    format: ExportFormat,
    layout: MatrixLayout,
    output_path: &Path,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Ply => save_ply(cloud, output_path),
        ExportFormat::Las => save_las(cloud, output_path),
        ExportFormat::Npy => save_npy(&to_vertex_matrix(cloud, layout), output_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Ply.extension(), "ply");
        assert_eq!(ExportFormat::Las.extension(), "las");
        assert_eq!(ExportFormat::Npy.extension(), "npy");
    }

    #[test]
    fn test_npy_export_writes_file() {
        let cloud = PointCloud::new(1, 1, vec![None]);
        let path = std::env::temp_dir().join(format!("depthcloud-{}.npy", uuid::Uuid::new_v4()));
        export_point_cloud(&cloud, ExportFormat::Npy, MatrixLayout::default(), &path).unwrap();

        let matrix: ndarray::Array2<f64> = ndarray_npy::read_npy(&path).unwrap();
        assert_eq!(matrix.dim(), (3, 1));
        assert_eq!(matrix[[0, 0]], 0.0);
        std::fs::remove_file(&path).ok();
    }
}
