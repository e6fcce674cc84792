//! Fuse synthetic depth maps of a sphere and write the field as `.vts`.
//!
//! Run with: `cargo run -p depthfuse --example sphere_fusion -- out.vts`

use anyhow::Result;
use depthfuse::core::synthetic::noise::UniformDepthNoise;
use depthfuse::core::synthetic::scene::{poses_orbit, render_views, Sphere};
use depthfuse::prelude::*;
use std::path::PathBuf;

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("sphere.vts"), PathBuf::from);

    let sphere = Sphere {
        center: Pt3::origin(),
        radius: 1.0,
    };
    let k = FxFyCxCySkew::new(300.0, 300.0, 159.5, 119.5).k_matrix();
    let noise = UniformDepthNoise {
        seed: 1,
        max_abs: 0.005,
    };
    let poses = poses_orbit(12, &sphere.center, 4.0, 1.5);
    let views = render_views(&k, &poses, 320, 240, &sphere, Some(&noise))?;
    println!("rendered {} views", views.len());

    let grid = VoxelGridDescriptor::new(
        [64, 64, 64],
        Vec3::repeat(3.0 / 63.0),
        Pt3::new(-1.5, -1.5, -1.5),
        GridBasis::identity(),
    );
    let mut engine = FusionEngine::configure(0.05, 1.0, true)?;
    let result = engine.run(&grid, &views)?;
    let stats = result.stats();
    println!(
        "{}/{} voxels observed, potential range {:?}..{:?}, {:.3}s",
        stats.observed,
        stats.voxels,
        stats.min_potential,
        stats.max_potential,
        engine.last_execution_time()
    );

    write_structured_grid(&output, &result)?;
    println!("wrote {}", output.display());
    Ok(())
}
