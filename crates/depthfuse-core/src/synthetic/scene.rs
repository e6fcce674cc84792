//! Ray-cast depth maps of simple analytic surfaces.
//!
//! Depths are principal-axis depths (`p_c.z`), the quantity stored by
//! multi-view stereo depth maps and consumed by the fusion engine.

use crate::synthetic::noise::UniformDepthNoise;
use crate::{CalibratedView, DepthMap, Iso3, Mat3, ProjectiveCamera, Pt2, Pt3, Real, Vec3};
use anyhow::{Context, Result};

/// A surface that can be intersected by camera rays.
pub trait Surface {
    /// Smallest positive `s` with `origin + s * dir` on the surface.
    fn intersect(&self, origin: &Pt3, dir: &Vec3) -> Option<Real>;
}

/// Infinite plane through `point` with normal `normal`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub point: Pt3,
    pub normal: Vec3,
}

impl Surface for Plane {
    fn intersect(&self, origin: &Pt3, dir: &Vec3) -> Option<Real> {
        let denom = self.normal.dot(dir);
        if denom.abs() < 1e-12 {
            return None;
        }
        let s = self.normal.dot(&(self.point - origin)) / denom;
        (s > 0.0).then_some(s)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Pt3,
    pub radius: Real,
}

impl Surface for Sphere {
    fn intersect(&self, origin: &Pt3, dir: &Vec3) -> Option<Real> {
        let oc = origin - self.center;
        let a = dir.dot(dir);
        let b = 2.0 * oc.dot(dir);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let near = (-b - sq) / (2.0 * a);
        let far = (-b + sq) / (2.0 * a);
        if near > 0.0 {
            Some(near)
        } else if far > 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

/// World → camera pose of a camera at `eye` looking at `target`.
///
/// The camera's +Z axis points towards the target.
pub fn look_at(eye: &Pt3, target: &Pt3, up: &Vec3) -> Iso3 {
    Iso3::face_towards(eye, target, up).inverse()
}

/// `n_views` cameras evenly spaced on a horizontal circle of `radius` around
/// `center`, raised by `height`, all looking at `center`.
pub fn poses_orbit(n_views: usize, center: &Pt3, radius: Real, height: Real) -> Vec<Iso3> {
    (0..n_views)
        .map(|view_idx| {
            let angle = std::f64::consts::TAU * view_idx as Real / n_views.max(1) as Real;
            let eye = center + Vec3::new(radius * angle.cos(), height, radius * angle.sin());
            look_at(&eye, center, &Vec3::y())
        })
        .collect()
}

/// Ray-cast `surface` into a `width x height` depth map.
///
/// Pixels whose ray misses the surface get depth 0 (no depth).
pub fn render_depth_map<S: Surface>(
    camera: &ProjectiveCamera,
    width: usize,
    height: usize,
    surface: &S,
) -> Result<DepthMap> {
    let k_inv = camera
        .k
        .try_inverse()
        .context("intrinsic matrix is not invertible")?;
    let r_t = camera.rotation.transpose();
    let origin = camera.center();

    let map = DepthMap::from_fn(width, height, |x, y| {
        let px = Pt2::new(x as Real, y as Real);
        // Unnormalized ray with unit principal-axis component: s == depth.
        let dir_c = k_inv * Vec3::new(px.x, px.y, 1.0);
        let dir_c = dir_c / dir_c.z;
        let dir_w = r_t * dir_c;
        surface.intersect(&origin, &dir_w).unwrap_or(0.0)
    })?;
    Ok(map)
}

/// Render a calibrated view of `surface`, optionally perturbing the depths.
pub fn render_view<S: Surface>(
    k: &Mat3,
    cam_se3_world: &Iso3,
    width: usize,
    height: usize,
    surface: &S,
    noise: Option<(&UniformDepthNoise, usize)>,
) -> Result<CalibratedView> {
    let pose = cam_se3_world.to_homogeneous();
    let camera = ProjectiveCamera::from_matrices(k, &pose);
    let mut depth = render_depth_map(&camera, width, height, surface)?;
    if let Some((noise, view_idx)) = noise {
        let noisy: Vec<Real> = depth
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, &d)| noise.apply(view_idx, i, d))
            .collect();
        depth = DepthMap::new(width, height, noisy)?;
    }
    Ok(CalibratedView::new(depth, *k, pose)?)
}

/// Render one view per pose.
pub fn render_views<S: Surface>(
    k: &Mat3,
    poses: &[Iso3],
    width: usize,
    height: usize,
    surface: &S,
    noise: Option<&UniformDepthNoise>,
) -> Result<Vec<CalibratedView>> {
    poses
        .iter()
        .enumerate()
        .map(|(idx, pose)| {
            render_view(k, pose, width, height, surface, noise.map(|n| (n, idx)))
                .with_context(|| format!("rendering view {idx}"))
        })
        .collect()
}
