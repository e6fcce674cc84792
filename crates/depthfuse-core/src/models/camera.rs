use serde::{Deserialize, Serialize};

use crate::math::{camera_to_pixel, pixel_to_normalized, split_rigid};
use crate::{Mat3, Mat4, Pt2, Pt3, Real, Vec3};

/// A world point seen through a camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraProjection {
    /// Continuous pixel coordinates after perspective division.
    pub pixel: Pt2,
    /// Depth along the principal axis in camera space (`p_c.z`).
    pub depth: Real,
}

/// Pinhole camera described by an intrinsic matrix and a world → camera pose.
///
/// The pose is stored as its rotation block and translation column so that the
/// hot projection path does not slice the 4×4 matrix again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectiveCamera {
    pub k: Mat3,
    pub rotation: Mat3,
    pub translation: Vec3,
}

impl ProjectiveCamera {
    pub fn new(k: Mat3, rotation: Mat3, translation: Vec3) -> Self {
        Self {
            k,
            rotation,
            translation,
        }
    }

    /// Build from K and a 4×4 `[R|t]` pose (world → camera).
    pub fn from_matrices(k: &Mat3, pose: &Mat4) -> Self {
        let (rotation, translation) = split_rigid(pose);
        Self::new(*k, rotation, translation)
    }

    /// Transform a world point into camera coordinates.
    #[inline]
    pub fn to_camera(&self, p_w: &Pt3) -> Vec3 {
        self.rotation * p_w.coords + self.translation
    }

    /// Project a world point.
    ///
    /// Returns `None` when the point is on or behind the camera plane.
    #[inline]
    pub fn project_world(&self, p_w: &Pt3) -> Option<CameraProjection> {
        let p_c = self.to_camera(p_w);
        if !(p_c.z > 0.0) {
            return None;
        }
        let pixel = camera_to_pixel(&p_c, &self.k)?;
        Some(CameraProjection {
            pixel,
            depth: p_c.z,
        })
    }

    /// Camera centre in world coordinates, `-Rᵀ t`.
    ///
    /// Assumes the rotation block is orthonormal.
    pub fn center(&self) -> Pt3 {
        Pt3::from(-(self.rotation.transpose() * self.translation))
    }

    /// World point at the given principal-axis depth along the ray through
    /// `pixel`. Returns `None` if K is singular.
    pub fn backproject(&self, pixel: Pt2, depth: Real) -> Option<Pt3> {
        let n = pixel_to_normalized(pixel, &self.k)?;
        let p_c = Vec3::new(n.x * depth, n.y * depth, depth);
        let p_w = self.rotation.transpose() * (p_c - self.translation);
        Some(Pt3::from(p_w))
    }
}
