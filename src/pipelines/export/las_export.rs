// SPDX-License-Identifier: GPL-3.0-only

//! LAS point cloud export
//!
//! Exports the valid points as an uncompressed LAS 1.4 file. Depth samples
//! are millimeters; LAS coordinates are written in meters.

use crate::constants::export::{LAS_SCALE, MILLIMETERS_PER_METER};
use crate::errors::ExportError;
use crate::pipelines::point_cloud::PointCloud;
use las::{Builder, Point, Writer};
use std::path::Path;
use tracing::{debug, info};

/// Save the valid points of `cloud` as a LAS file
pub fn save_las(cloud: &PointCloud, output_path: &Path) -> Result<(), ExportError> {
    let points: Vec<(f64, f64, f64)> = cloud
        .valid_points()
        .map(|p| {
            (
                p.x as f64 / MILLIMETERS_PER_METER,
                p.y as f64 / MILLIMETERS_PER_METER,
                p.z as f64 / MILLIMETERS_PER_METER,
            )
        })
        .collect();

    if points.is_empty() {
        return Err(ExportError::EmptyCloud);
    }

    info!(
        point_count = points.len(),
        path = %output_path.display(),
        "Exporting point cloud as LAS"
    );

    // Offsets centred on the data keep coordinates within i32 range
    let (min_x, max_x) = bounds(points.iter().map(|p| p.0));
    let (min_y, max_y) = bounds(points.iter().map(|p| p.1));
    let (min_z, max_z) = bounds(points.iter().map(|p| p.2));

    let mut builder = Builder::from((1, 4));
    builder.point_format.is_compressed = false;
    builder.transforms = las::Vector {
        x: las::Transform {
            scale: LAS_SCALE,
            offset: (min_x + max_x) / 2.0,
        },
        y: las::Transform {
            scale: LAS_SCALE,
            offset: (min_y + max_y) / 2.0,
        },
        z: las::Transform {
            scale: LAS_SCALE,
            offset: (min_z + max_z) / 2.0,
        },
    };

    let header = builder
        .into_header()
        .map_err(|e| ExportError::Las(format!("Failed to build LAS header: {}", e)))?;

    let mut writer = Writer::from_path(output_path, header)
        .map_err(|e| ExportError::Las(format!("Failed to create LAS writer: {}", e)))?;

    for (x, y, z) in points {
        let point = Point {
            x,
            y,
            z,
            ..Default::default()
        };
        writer
            .write_point(point)
            .map_err(|e| ExportError::Las(format!("Failed to write point: {}", e)))?;
    }

    writer
        .close()
        .map_err(|e| ExportError::Las(format!("Failed to close LAS file: {}", e)))?;

    debug!(path = %output_path.display(), "LAS export complete");
    Ok(())
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::MAX, f64::MIN), |(min, max), v| (min.min(v), max.max(v)))
}
