//! Scheduling of the voxel pass.

use crate::kernel::VoxelKernel;
use depthfuse_core::Real;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// How voxels are distributed over workers.
///
/// Implementations must write `kernel.fuse_voxel(n)` into slot `n` of both
/// buffers for every voxel; results are then identical across strategies.
pub trait FusionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn fuse(&self, kernel: &VoxelKernel<'_>, potentials: &mut [Real], counts: &mut [u32]);
}

/// Single worker, voxels in linear-index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl FusionStrategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn fuse(&self, kernel: &VoxelKernel<'_>, potentials: &mut [Real], counts: &mut [u32]) {
        for (n, (p, c)) in potentials.iter_mut().zip(counts.iter_mut()).enumerate() {
            let sample = kernel.fuse_voxel(n);
            *p = sample.potential;
            *c = sample.count;
        }
    }
}

/// Rayon data parallelism over rows of `nx` voxels.
#[derive(Debug, Default)]
pub struct Parallel {
    pool: Option<ThreadPool>,
}

impl Parallel {
    /// Run on rayon's global pool.
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Run on a dedicated pool of `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(Self { pool: Some(pool) })
    }

    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads)
    }

    fn fuse_rows(kernel: &VoxelKernel<'_>, potentials: &mut [Real], counts: &mut [u32]) {
        let nx = kernel.grid().dims[0];
        potentials
            .par_chunks_mut(nx)
            .zip(counts.par_chunks_mut(nx))
            .enumerate()
            .for_each(|(row, (p_row, c_row))| {
                let base = row * nx;
                for (x, (p, c)) in p_row.iter_mut().zip(c_row.iter_mut()).enumerate() {
                    let sample = kernel.fuse_voxel(base + x);
                    *p = sample.potential;
                    *c = sample.count;
                }
            });
    }
}

impl FusionStrategy for Parallel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn fuse(&self, kernel: &VoxelKernel<'_>, potentials: &mut [Real], counts: &mut [u32]) {
        match &self.pool {
            Some(pool) => pool.install(|| Self::fuse_rows(kernel, potentials, counts)),
            None => Self::fuse_rows(kernel, potentials, counts),
        }
    }
}
