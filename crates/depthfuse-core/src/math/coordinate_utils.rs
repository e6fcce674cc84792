//! Coordinate transformation utilities for camera projection.
//!
//! This module provides functions for converting between camera-space points,
//! normalized camera coordinates and pixel coordinates.

use crate::{Mat3, Pt2, Real, Vec2, Vec3};

/// Convert pixel coordinates to normalized coordinates using intrinsics.
///
/// Applies K^{-1} to transform pixel coordinates to the normalized image plane
/// (Z=1 in camera frame). Returns `None` if K is singular.
///
/// # Example
/// ```
/// use depthfuse_core::{Mat3, Pt2};
/// use depthfuse_core::math::pixel_to_normalized;
///
/// let k = Mat3::new(800.0, 0.0, 640.0, 0.0, 800.0, 480.0, 0.0, 0.0, 1.0);
/// let normalized = pixel_to_normalized(Pt2::new(640.0, 480.0), &k).unwrap();
/// assert!(normalized.norm() < 1e-12);
/// ```
pub fn pixel_to_normalized(pixel: Pt2, intrinsics: &Mat3) -> Option<Vec2> {
    let k_inv = intrinsics.try_inverse()?;
    let v = k_inv * Vec3::new(pixel.x, pixel.y, 1.0);
    Some(Vec2::new(v.x / v.z, v.y / v.z))
}

/// Map a camera-space point to pixel coordinates: `K * p_c` followed by the
/// perspective division.
///
/// Returns `None` when the homogeneous scale is not strictly positive (point
/// on or behind the image plane) or the result is not finite.
pub fn camera_to_pixel(p_c: &Vec3, intrinsics: &Mat3) -> Option<Pt2> {
    let q = intrinsics * p_c;
    if q.z <= 0.0 {
        return None;
    }
    let px = Pt2::new(q.x / q.z, q.y / q.z);
    (px.x.is_finite() && px.y.is_finite()).then_some(px)
}

/// Nearest integer pixel for a continuous pixel coordinate.
///
/// The continuous coordinate must lie in `[0, width) x [0, height)`;
/// anything outside (or non-finite) gives `None`. Inside, the index is the
/// coordinate rounded half away from zero, clamped to the last row/column.
pub fn nearest_pixel(pixel: &Pt2, width: usize, height: usize) -> Option<(usize, usize)> {
    let (w, h) = (width as Real, height as Real);
    if !(pixel.x >= 0.0 && pixel.y >= 0.0 && pixel.x < w && pixel.y < h) {
        return None;
    }
    let u = (pixel.x.round() as usize).min(width - 1);
    let v = (pixel.y.round() as usize).min(height - 1);
    Some((u, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_to_pixel_matches_pinhole() {
        let k = Mat3::new(500.0, 0.0, 320.0, 0.0, 500.0, 240.0, 0.0, 0.0, 1.0);
        let px = camera_to_pixel(&Vec3::new(1.0, 1.0, 5.0), &k).unwrap();

        // x = 1.0 * 500 / 5.0 + 320 = 420
        assert!((px.x - 420.0).abs() < 1e-12);
        assert!((px.y - 340.0).abs() < 1e-12);
    }

    #[test]
    fn camera_to_pixel_rejects_points_behind() {
        let k = Mat3::identity();
        assert!(camera_to_pixel(&Vec3::new(0.0, 0.0, -1.0), &k).is_none());
        assert!(camera_to_pixel(&Vec3::new(1.0, 0.0, 0.0), &k).is_none());
    }

    #[test]
    fn pixel_normalized_roundtrip() {
        let k = Mat3::new(800.0, 0.0, 640.0, 0.0, 780.0, 360.0, 0.0, 0.0, 1.0);
        let pixel_orig = Pt2::new(700.0, 400.0);

        let n = pixel_to_normalized(pixel_orig, &k).unwrap();
        let pixel_back = camera_to_pixel(&Vec3::new(n.x, n.y, 1.0), &k).unwrap();

        assert!((pixel_back.x - pixel_orig.x).abs() < 1e-10);
        assert!((pixel_back.y - pixel_orig.y).abs() < 1e-10);
    }

    #[test]
    fn singular_intrinsics_have_no_inverse() {
        assert!(pixel_to_normalized(Pt2::origin(), &Mat3::zeros()).is_none());
    }

    #[test]
    fn nearest_pixel_bounds() {
        assert_eq!(nearest_pixel(&Pt2::new(-0.4, 0.2), 4, 3), None);
        assert_eq!(nearest_pixel(&Pt2::new(0.0, 0.0), 4, 3), Some((0, 0)));
        assert_eq!(nearest_pixel(&Pt2::new(1.5, 0.49), 4, 3), Some((2, 0)));
        assert_eq!(nearest_pixel(&Pt2::new(3.49, 2.4), 4, 3), Some((3, 2)));
        // inside the image but rounding past the edge: clamped
        assert_eq!(nearest_pixel(&Pt2::new(3.5, 2.9), 4, 3), Some((3, 2)));
        assert_eq!(nearest_pixel(&Pt2::new(4.0, 0.0), 4, 3), None);
        assert_eq!(nearest_pixel(&Pt2::new(0.0, 3.0), 4, 3), None);
        assert_eq!(nearest_pixel(&Pt2::new(Real::NAN, 0.0), 4, 3), None);
    }
}
