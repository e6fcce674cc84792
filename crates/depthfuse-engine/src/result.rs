//! Output of a fusion run.

use depthfuse_core::{Pt3, Real, VoxelGridDescriptor};
use serde::{Deserialize, Serialize};

/// Stored potential of voxels that no view observed.
pub const UNOBSERVED_POTENTIAL: Real = Real::NAN;

/// Fused potentials and observation counts for every voxel of a grid.
///
/// Both buffers are indexed by [`VoxelGridDescriptor::linear_index`].
#[derive(Debug, Clone)]
pub struct ResultGrid {
    descriptor: VoxelGridDescriptor,
    potentials: Vec<Real>,
    counts: Vec<u32>,
}

/// Summary statistics of a [`ResultGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FusionStats {
    pub voxels: usize,
    pub observed: usize,
    pub unobserved: usize,
    /// `None` when no voxel was observed.
    pub min_potential: Option<Real>,
    pub max_potential: Option<Real>,
    pub max_count: u32,
}

impl ResultGrid {
    /// Assemble a grid from raw buffers.
    ///
    /// Potentials of voxels with a zero count are replaced by
    /// [`UNOBSERVED_POTENTIAL`].
    ///
    /// # Panics
    ///
    /// Panics if a buffer length differs from the voxel count.
    pub fn from_parts(
        descriptor: VoxelGridDescriptor,
        mut potentials: Vec<Real>,
        counts: Vec<u32>,
    ) -> Self {
        let n = descriptor.voxel_count();
        assert_eq!(potentials.len(), n, "potential buffer length");
        assert_eq!(counts.len(), n, "count buffer length");
        for (p, &c) in potentials.iter_mut().zip(&counts) {
            if c == 0 {
                *p = UNOBSERVED_POTENTIAL;
            }
        }
        Self {
            descriptor,
            potentials,
            counts,
        }
    }

    pub fn descriptor(&self) -> &VoxelGridDescriptor {
        &self.descriptor
    }

    pub fn dims(&self) -> [usize; 3] {
        self.descriptor.dims
    }

    pub fn len(&self) -> usize {
        self.potentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.potentials.is_empty()
    }

    /// Fused potential at `(i, j, k)`, `None` if out of range or unobserved.
    pub fn potential(&self, i: usize, j: usize, k: usize) -> Option<Real> {
        let [nx, ny, nz] = self.descriptor.dims;
        if i >= nx || j >= ny || k >= nz {
            return None;
        }
        self.potential_linear(self.descriptor.linear_index(i, j, k))
    }

    pub fn potential_linear(&self, linear: usize) -> Option<Real> {
        match self.counts.get(linear) {
            Some(&c) if c > 0 => Some(self.potentials[linear]),
            _ => None,
        }
    }

    /// Number of views that observed `(i, j, k)`; 0 out of range.
    pub fn count(&self, i: usize, j: usize, k: usize) -> u32 {
        let [nx, ny, nz] = self.descriptor.dims;
        if i >= nx || j >= ny || k >= nz {
            return 0;
        }
        self.counts[self.descriptor.linear_index(i, j, k)]
    }

    /// Raw potentials, [`UNOBSERVED_POTENTIAL`] where unobserved.
    pub fn potentials(&self) -> &[Real] {
        &self.potentials
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// World-space voxel centres in linear-index order.
    pub fn world_points(&self) -> impl Iterator<Item = Pt3> + '_ {
        self.descriptor.voxel_centers()
    }

    pub fn stats(&self) -> FusionStats {
        let mut stats = FusionStats {
            voxels: self.len(),
            ..FusionStats::default()
        };
        for (&p, &c) in self.potentials.iter().zip(&self.counts) {
            if c == 0 {
                stats.unobserved += 1;
                continue;
            }
            stats.observed += 1;
            stats.max_count = stats.max_count.max(c);
            stats.min_potential = Some(stats.min_potential.map_or(p, |m| m.min(p)));
            stats.max_potential = Some(stats.max_potential.map_or(p, |m| m.max(p)));
        }
        stats
    }
}
