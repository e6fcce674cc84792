//! Projection of voxel centres into depth maps.

use depthfuse_core::{CalibratedView, DepthMap, ProjectiveCamera, Pt3, Real};

/// A voxel centre that landed on a valid depth sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Principal-axis depth of the voxel centre in the camera frame.
    pub ray_depth: Real,
    /// Depth stored in the depth map at the voxel's pixel.
    pub observed_depth: Real,
}

impl Observation {
    /// Signed distance along the ray; positive behind the observed surface.
    #[inline]
    pub fn signed_distance(&self) -> Real {
        self.ray_depth - self.observed_depth
    }
}

/// Project `p_w` into a depth map and look up the nearest sample.
///
/// Returns `None` when the point is behind the camera, projects outside the
/// image, or hits a pixel with no depth.
#[inline]
pub fn observe(camera: &ProjectiveCamera, depth_map: &DepthMap, p_w: &Pt3) -> Option<Observation> {
    let proj = camera.project_world(p_w)?;
    if !proj.depth.is_finite() {
        return None;
    }
    let observed_depth = depth_map.sample_nearest(&proj.pixel)?;
    Some(Observation {
        ray_depth: proj.depth,
        observed_depth,
    })
}

/// A view prepared for repeated projection: the pose is split once.
#[derive(Debug, Clone)]
pub struct ViewProjector<'a> {
    camera: ProjectiveCamera,
    depth_map: &'a DepthMap,
}

impl<'a> ViewProjector<'a> {
    pub fn new(view: &'a CalibratedView) -> Self {
        Self {
            camera: view.camera(),
            depth_map: view.depth_map(),
        }
    }

    #[inline]
    pub fn observe(&self, p_w: &Pt3) -> Option<Observation> {
        observe(&self.camera, self.depth_map, p_w)
    }
}
