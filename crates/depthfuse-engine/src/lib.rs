//! Volumetric fusion of calibrated depth maps.
//!
//! Every voxel centre of a [`depthfuse_core::VoxelGridDescriptor`] is
//! projected into each [`depthfuse_core::CalibratedView`]. Where it lands on a
//! valid depth sample, the signed distance between the voxel and the observed
//! surface is mapped through a bounded [`RayPotential`] and summed:
//!
//! - negative values: the voxel lies in observed free space,
//! - values near zero: the voxel lies on an observed surface,
//! - positive values: the voxel is hidden behind a surface.
//!
//! The voxel pass runs either sequentially or with rayon (see [`strategy`]);
//! both produce identical results.

mod engine;
mod error;
pub mod kernel;
mod potential;
pub mod projection;
mod result;
pub mod strategy;

pub use engine::*;
pub use error::*;
pub use kernel::{VoxelKernel, VoxelSample};
pub use potential::*;
pub use projection::{observe, Observation};
pub use result::*;
