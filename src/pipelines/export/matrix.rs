// SPDX-License-Identifier: GPL-3.0-only

//! Vertex matrix for numeric hosts
//!
//! The matrix has three rows (x, y, z) and one column per point. A dense
//! matrix keeps one column per pixel, so column `i` belongs to depth pixel
//! `i`. Invalid pixels are written with an explicit fill value.

use crate::errors::ExportError;
use crate::pipelines::point_cloud::PointCloud;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Value written into the columns of invalid pixels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum InvalidFill {
    #[default]
    Zero,
    Nan,
}

impl InvalidFill {
    fn value(self) -> f64 {
        match self {
            InvalidFill::Zero => 0.0,
            InvalidFill::Nan => f64::NAN,
        }
    }
}

/// Column layout of the vertex matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixLayout {
    /// One column per pixel
    Dense { fill: InvalidFill },
    /// One column per valid point, in pixel order
    Compact,
}

impl Default for MatrixLayout {
    fn default() -> Self {
        MatrixLayout::Dense {
            fill: InvalidFill::default(),
        }
    }
}

/// Pack `cloud` into a `3 x N` matrix
pub fn to_vertex_matrix(cloud: &PointCloud, layout: MatrixLayout) -> Array2<f64> {
    match layout {
        MatrixLayout::Dense { fill } => {
            let mut matrix = Array2::from_elem((3, cloud.len()), fill.value());
            for (column, point) in cloud.points().iter().enumerate() {
                if let Some(point) = point {
                    matrix[[0, column]] = point.x as f64;
                    matrix[[1, column]] = point.y as f64;
                    matrix[[2, column]] = point.z as f64;
                }
            }
            matrix
        }
        MatrixLayout::Compact => {
            let mut matrix = Array2::zeros((3, cloud.valid_point_count()));
            for (column, point) in cloud.valid_points().enumerate() {
                matrix[[0, column]] = point.x as f64;
                matrix[[1, column]] = point.y as f64;
                matrix[[2, column]] = point.z as f64;
            }
            matrix
        }
    }
}

/// Save a vertex matrix as a `.npy` file
pub fn save_npy(matrix: &Array2<f64>, output_path: &Path) -> Result<(), ExportError> {
    info!(
        rows = matrix.nrows(),
        columns = matrix.ncols(),
        path = %output_path.display(),
        "Exporting vertex matrix"
    );

    ndarray_npy::write_npy(output_path, matrix).map_err(|e| ExportError::Npy(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::point_cloud::Point3;

    fn sample_cloud() -> PointCloud {
        PointCloud::new(
            3,
            1,
            vec![
                None,
                Some(Point3 {
                    x: 1.0,
                    y: 2.0,
                    z: 3.0,
                }),
                Some(Point3 {
                    x: 4.0,
                    y: 5.0,
                    z: 6.0,
                }),
            ],
        )
    }

    #[test]
    fn test_dense_zero_fill() {
        let matrix = to_vertex_matrix(&sample_cloud(), MatrixLayout::default());
        assert_eq!(matrix.dim(), (3, 3));
        assert_eq!(matrix.column(0).to_vec(), vec![0.0, 0.0, 0.0]);
        assert_eq!(matrix.column(1).to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(matrix.column(2).to_vec(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_dense_nan_fill() {
        let matrix = to_vertex_matrix(
            &sample_cloud(),
            MatrixLayout::Dense {
                fill: InvalidFill::Nan,
            },
        );
        assert!(matrix.column(0).iter().all(|v| v.is_nan()));
        assert_eq!(matrix[[2, 1]], 3.0);
    }

    #[test]
    fn test_compact_has_one_column_per_valid_point() {
        let cloud = sample_cloud();
        let matrix = to_vertex_matrix(&cloud, MatrixLayout::Compact);
        assert_eq!(matrix.dim(), (3, cloud.valid_point_count()));
        assert_eq!(matrix.column(0).to_vec(), vec![1.0, 2.0, 3.0]);
    }
}
