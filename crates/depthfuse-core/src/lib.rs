//! Core math and geometry primitives for `depthfuse`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, `Pt3`, `Mat4`, ...),
//! - the pinhole camera model used to project voxels into depth maps,
//! - [`DepthMap`] and [`CalibratedView`], the per-view inputs of fusion,
//! - [`VoxelGridDescriptor`], the placement of the output volume.
//!
//! Projection pipeline for a world point `p_w`:
//! `p_c = R * p_w + t`, `pixel = K * p_c / p_c.z`, `depth = p_c.z`.

/// Linear algebra type aliases and helpers.
pub mod math;
mod grid;
mod models;
mod types;
mod view;

/// Deterministic synthetic scenes for tests and demos.
pub mod synthetic;
pub mod test_utils;

pub use grid::*;
pub use math::*;
pub use models::*;
pub use types::*;
pub use view::*;
