//! High-level entry crate for `depthfuse`.
//!
//! `depthfuse` fuses a set of calibrated depth maps into a regular voxel grid.
//! Every voxel centre is projected into each view; where it lands on a valid
//! depth sample, the signed distance to the observed surface is mapped through
//! a bounded ray potential and accumulated, together with the number of views
//! that observed the voxel. An iso-surface of the result can then be extracted
//! by external tools (e.g. from the written `.vts` file).
//!
//! ```no_run
//! use depthfuse::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dataset = load_dataset(&DatasetConfig::new("/path/to/data"))?;
//! let grid = VoxelGridDescriptor::new(
//!     [100, 100, 100],
//!     Vec3::repeat(0.1),
//!     Pt3::new(-5.0, -5.0, -5.0),
//!     GridBasis::identity(),
//! );
//!
//! let mut engine = FusionEngine::configure(2.0, 3.0, true)?;
//! let result = engine.run(&grid, &dataset.views)?;
//! println!("{} voxels observed", result.stats().observed);
//!
//! write_structured_grid("output.vts".as_ref(), &result)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **[`core`]**: math aliases, camera model, depth maps, views, grids
//! - **[`engine`]**: ray potential and the fusion engine
//! - **[`io`]**: list files, `.krtd`, depth-map decoding, `.vts` and reports
//! - **[`prelude`]**: convenient re-exports for common use cases

/// Geometry primitives and input types.
pub mod core {
    pub use depthfuse_core::*;
}

/// Fusion engine.
pub mod engine {
    pub use depthfuse_engine::*;
}

/// Dataset loading and result writing.
pub mod io {
    pub use depthfuse_io::*;
}

/// Import with `use depthfuse::prelude::*;` to get started quickly.
pub mod prelude {
    pub use depthfuse_core::{
        CalibratedView, CalibratedViewBuilder, DepthMap, FxFyCxCySkew, GridBasis, Mat3, Mat4,
        Pt3, Real, Vec3, VoxelGridDescriptor,
    };
    pub use depthfuse_engine::{FusionConfig, FusionEngine, FusionError, RayPotential, ResultGrid};
    pub use depthfuse_io::{load_dataset, write_structured_grid, DatasetConfig};
}
