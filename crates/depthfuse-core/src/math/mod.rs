//! Mathematical utilities and type definitions.
//!
//! This module provides the fundamental types used throughout the workspace
//! and small helpers for rigid transforms, matrix checks and pixel
//! coordinates.

use nalgebra::{Isometry3, Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};

pub mod coordinate_utils;

pub use coordinate_utils::{camera_to_pixel, nearest_pixel, pixel_to_normalized};

/// Scalar type used throughout the workspace (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 4×4 matrix with [`Real`] entries.
pub type Mat4 = Matrix4<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;

/// Assemble a 4×4 `[R|t]` matrix with bottom row `[0, 0, 0, 1]`.
pub fn rigid_matrix(rotation: &Mat3, translation: &Vec3) -> Mat4 {
    let mut m = Mat4::identity();
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
    m
}

/// Split a 4×4 `[R|t]` matrix into its rotation block and translation column.
pub fn split_rigid(m: &Mat4) -> (Mat3, Vec3) {
    (
        m.fixed_view::<3, 3>(0, 0).into_owned(),
        m.fixed_view::<3, 1>(0, 3).into_owned(),
    )
}

/// Returns true if every entry of the matrix is finite.
pub fn is_finite_matrix<R, C, S>(m: &nalgebra::Matrix<Real, R, C, S>) -> bool
where
    R: nalgebra::Dim,
    C: nalgebra::Dim,
    S: nalgebra::RawStorage<Real, R, C>,
{
    m.iter().all(|v| v.is_finite())
}

/// Returns true if the bottom row is exactly `[0, 0, 0, 1]`.
pub fn has_affine_bottom_row(m: &Mat4) -> bool {
    m[(3, 0)] == 0.0 && m[(3, 1)] == 0.0 && m[(3, 2)] == 0.0 && m[(3, 3)] == 1.0
}

/// Returns true if `a` and `b` are orthogonal within a tolerance relative to
/// their lengths: `|a·b| <= rel_tol * |a| * |b|`.
pub fn are_orthogonal(a: &Vec3, b: &Vec3, rel_tol: Real) -> bool {
    a.dot(b).abs() <= rel_tol * a.norm() * b.norm()
}
