//! Small fixtures shared by the workspace test suites.
//!
//! This module is public to allow use across crates, but is not intended for
//! production use.

use crate::{
    rigid_matrix, CalibratedView, DepthMap, FxFyCxCySkew, GridBasis, Mat3, Mat4, Pt3, Real,
    Vec3, VoxelGridDescriptor,
};

/// Pinhole K with square pixels and the principal point at the image centre.
pub fn centered_intrinsics(focal: Real, width: usize, height: usize) -> Mat3 {
    FxFyCxCySkew::new(
        focal,
        focal,
        (width as Real - 1.0) * 0.5,
        (height as Real - 1.0) * 0.5,
    )
    .k_matrix()
}

/// World → camera pose of a camera at `center` with the given rotation.
pub fn pose_at(rotation: &Mat3, center: &Pt3) -> Mat4 {
    rigid_matrix(rotation, &(-(rotation * center.coords)))
}

/// Axis-aligned grid.
pub fn axis_aligned_grid(dims: [usize; 3], spacing: Real, origin: Pt3) -> VoxelGridDescriptor {
    VoxelGridDescriptor::new(
        dims,
        Vec3::repeat(spacing),
        origin,
        GridBasis::identity(),
    )
}

/// A view whose every pixel reports `depth`.
///
/// # Panics
///
/// Panics if the dimensions are zero or the matrices are malformed.
pub fn constant_depth_view(
    k: &Mat3,
    pose: &Mat4,
    width: usize,
    height: usize,
    depth: Real,
) -> CalibratedView {
    let map = DepthMap::filled(width, height, depth).expect("valid depth map dimensions");
    CalibratedView::new(map, *k, *pose).expect("valid view matrices")
}

/// Absolute-tolerance float comparison used by tests.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() <= eps
}
