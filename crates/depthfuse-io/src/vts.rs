//! VTK XML StructuredGrid (`.vts`) output.
//!
//! Points are written in world space (grid basis and origin applied). Point
//! data holds `reconstruction_scalar` (Float64, `nan` where no view observed
//! the voxel), `observation_count` (UInt32) and `vtkValidPointMask` (UInt8,
//! 1 where at least one view observed the voxel).
//!
//! The ASCII `nan` token is parsed by the reader's C++ stream and is not
//! accepted by every VTK build. Readers that reject or zero it can still
//! hide unobserved voxels through `vtkValidPointMask`.

use anyhow::{Context, Result};
use depthfuse_core::Real;
use depthfuse_engine::ResultGrid;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const SCALAR_ARRAY: &str = "reconstruction_scalar";
pub const COUNT_ARRAY: &str = "observation_count";
pub const MASK_ARRAY: &str = "vtkValidPointMask";

const VALUES_PER_LINE: usize = 6;

fn write_real<W: Write>(w: &mut W, v: Real) -> io::Result<()> {
    if v.is_nan() {
        w.write_all(b"nan")
    } else {
        write!(w, "{v:e}")
    }
}

fn write_values<W: Write, T>(
    w: &mut W,
    values: impl Iterator<Item = T>,
    mut write_one: impl FnMut(&mut W, T) -> io::Result<()>,
) -> io::Result<()> {
    for (n, v) in values.enumerate() {
        if n % VALUES_PER_LINE == 0 {
            w.write_all(b"\n          ")?;
        } else {
            w.write_all(b" ")?;
        }
        write_one(w, v)?;
    }
    w.write_all(b"\n        ")
}

/// Serialize `grid` as an ASCII structured grid.
pub fn write_structured_grid_to<W: Write>(w: &mut W, grid: &ResultGrid) -> io::Result<()> {
    let [nx, ny, nz] = grid.dims();
    let extent = format!(
        "0 {} 0 {} 0 {}",
        nx.saturating_sub(1),
        ny.saturating_sub(1),
        nz.saturating_sub(1)
    );

    writeln!(w, r#"<?xml version="1.0"?>"#)?;
    writeln!(
        w,
        r#"<VTKFile type="StructuredGrid" version="0.1" byte_order="LittleEndian">"#
    )?;
    writeln!(w, r#"  <StructuredGrid WholeExtent="{extent}">"#)?;
    writeln!(w, r#"    <Piece Extent="{extent}">"#)?;

    writeln!(w, r#"      <PointData Scalars="{SCALAR_ARRAY}">"#)?;
    write!(
        w,
        r#"        <DataArray type="Float64" Name="{SCALAR_ARRAY}" format="ascii">"#
    )?;
    write_values(w, grid.potentials().iter().copied(), write_real)?;
    writeln!(w, "</DataArray>")?;
    write!(
        w,
        r#"        <DataArray type="UInt32" Name="{COUNT_ARRAY}" format="ascii">"#
    )?;
    write_values(w, grid.counts().iter().copied(), |w, c| write!(w, "{c}"))?;
    writeln!(w, "</DataArray>")?;
    write!(
        w,
        r#"        <DataArray type="UInt8" Name="{MASK_ARRAY}" format="ascii">"#
    )?;
    let mask = grid.counts().iter().map(|&c| u8::from(c > 0));
    write_values(w, mask, |w, m| write!(w, "{m}"))?;
    writeln!(w, "</DataArray>")?;
    writeln!(w, "      </PointData>")?;

    writeln!(w, "      <Points>")?;
    write!(
        w,
        r#"        <DataArray type="Float64" NumberOfComponents="3" format="ascii">"#
    )?;
    let coords = grid.world_points().flat_map(|p| [p.x, p.y, p.z]);
    write_values(w, coords, write_real)?;
    writeln!(w, "</DataArray>")?;
    writeln!(w, "      </Points>")?;

    writeln!(w, "    </Piece>")?;
    writeln!(w, "  </StructuredGrid>")?;
    writeln!(w, "</VTKFile>")?;
    Ok(())
}

pub fn write_structured_grid(path: &Path, grid: &ResultGrid) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_structured_grid_to(&mut writer, grid)
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write {}", path.display()))
}
