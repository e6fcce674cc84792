//! Per-voxel fusion.

use crate::projection::ViewProjector;
use crate::RayPotential;
use depthfuse_core::{CalibratedView, Real, VoxelGridDescriptor};

/// Fused evidence for one voxel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelSample {
    /// Sum of per-view potentials; 0 when `count == 0`.
    pub potential: Real,
    /// Number of views that observed the voxel.
    pub count: u32,
}

/// Everything a worker needs to fuse any voxel of a grid.
///
/// Borrowed data only; shared between rayon tasks by reference.
#[derive(Debug)]
pub struct VoxelKernel<'a> {
    grid: &'a VoxelGridDescriptor,
    projectors: Vec<ViewProjector<'a>>,
    potential: RayPotential,
}

impl<'a> VoxelKernel<'a> {
    pub fn new(
        grid: &'a VoxelGridDescriptor,
        views: &'a [CalibratedView],
        potential: RayPotential,
    ) -> Self {
        Self {
            grid,
            projectors: views.iter().map(ViewProjector::new).collect(),
            potential,
        }
    }

    pub fn grid(&self) -> &VoxelGridDescriptor {
        self.grid
    }

    /// Fuse the voxel with the given linear index.
    ///
    /// Views are visited in slice order so the floating-point sum does not
    /// depend on how voxels are scheduled.
    #[inline]
    pub fn fuse_voxel(&self, linear: usize) -> VoxelSample {
        let p_w = self.grid.voxel_center_linear(linear);
        let mut potential = 0.0;
        let mut count = 0u32;
        for projector in &self.projectors {
            if let Some(obs) = projector.observe(&p_w) {
                potential += self.potential.evaluate(obs.signed_distance());
                count += 1;
            }
        }
        VoxelSample { potential, count }
    }
}
