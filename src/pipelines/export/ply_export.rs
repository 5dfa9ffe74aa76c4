// SPDX-License-Identifier: GPL-3.0-only

//! ASCII PLY point export
//!
//! Writes the valid points only, one `x y z` line each, under a vertex-only
//! header. No faces are written.

use crate::errors::ExportError;
use crate::pipelines::point_cloud::PointCloud;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Write `cloud` as ASCII PLY to `writer`
pub fn write_ply<W: Write>(cloud: &PointCloud, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", cloud.valid_point_count())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "end_header")?;

    for point in cloud.valid_points() {
        writeln!(writer, "{} {} {}", point.x, point.y, point.z)?;
    }

    Ok(())
}

/// Save `cloud` as an ASCII PLY file
pub fn save_ply(cloud: &PointCloud, output_path: &Path) -> Result<(), ExportError> {
    info!(
        point_count = cloud.valid_point_count(),
        path = %output_path.display(),
        "Exporting point cloud as PLY"
    );

    let mut writer = BufWriter::new(File::create(output_path)?);
    write_ply(cloud, &mut writer)?;
    writer.flush()?;

    debug!(path = %output_path.display(), "PLY export complete");
    Ok(())
}
