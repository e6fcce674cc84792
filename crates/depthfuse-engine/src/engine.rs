use crate::kernel::VoxelKernel;
use crate::strategy::{FusionStrategy, Parallel, Sequential};
use crate::{FusionError, RayPotential, ResultGrid};
use depthfuse_core::{CalibratedView, Real, VoxelGridDescriptor};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Fusion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Half-width of the linear band of the ray potential (world units).
    pub thickness: Real,
    /// Magnitude of the ray potential outside the band.
    pub rho: Real,
    /// Use the rayon strategy instead of the sequential reference path.
    pub parallel: bool,
    /// Worker count for a dedicated pool; `None` uses rayon's global pool.
    pub threads: Option<usize>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            thickness: 2.0,
            rho: 3.0,
            parallel: true,
            threads: None,
        }
    }
}

/// Fuses calibrated depth maps into a voxel grid.
///
/// # Example
///
/// ```
/// use depthfuse_core::test_utils::{axis_aligned_grid, constant_depth_view};
/// use depthfuse_core::{FxFyCxCySkew, Mat4, Pt3};
/// use depthfuse_engine::FusionEngine;
///
/// let k = FxFyCxCySkew::new(1.0, 1.0, 0.0, 0.0).k_matrix();
/// let views = vec![constant_depth_view(&k, &Mat4::identity(), 1, 1, 2.0)];
/// let grid = axis_aligned_grid([1, 1, 4], 1.0, Pt3::new(0.0, 0.0, 1.0));
///
/// let mut engine = FusionEngine::configure(1.0, 1.0, false).unwrap();
/// let result = engine.run(&grid, &views).unwrap();
/// assert_eq!(result.potential(0, 0, 0), Some(-1.0));
/// assert_eq!(result.potential(0, 0, 1), Some(0.0));
/// ```
pub struct FusionEngine {
    potential: RayPotential,
    strategy: Box<dyn FusionStrategy>,
    last_execution_time: Real,
}

impl std::fmt::Debug for FusionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FusionEngine")
            .field("potential", &self.potential)
            .field("strategy", &self.strategy.name())
            .field("last_execution_time", &self.last_execution_time)
            .finish()
    }
}

impl FusionEngine {
    /// # Errors
    ///
    /// [`FusionError::InvalidParameter`] if `thickness` or `rho` is
    /// non-positive or not finite.
    pub fn configure(thickness: Real, rho: Real, use_parallel: bool) -> Result<Self, FusionError> {
        Self::from_config(&FusionConfig {
            thickness,
            rho,
            parallel: use_parallel,
            threads: None,
        })
    }

    /// Like [`FusionEngine::configure`], with an optional dedicated pool.
    ///
    /// If the pool cannot be created the engine falls back to the sequential
    /// strategy.
    pub fn from_config(config: &FusionConfig) -> Result<Self, FusionError> {
        let potential = RayPotential::new(config.thickness, config.rho)?;
        let strategy: Box<dyn FusionStrategy> = match (config.parallel, config.threads) {
            (false, _) => Box::new(Sequential),
            (true, None) => Box::new(Parallel::new()),
            (true, Some(threads)) => match Parallel::with_threads(threads) {
                Ok(parallel) => Box::new(parallel),
                Err(err) => {
                    warn!("cannot build a {threads}-thread pool ({err}); fusing sequentially");
                    Box::new(Sequential)
                }
            },
        };
        Ok(Self::with_strategy(potential, strategy))
    }

    /// Use a caller-provided scheduling strategy.
    pub fn with_strategy(potential: RayPotential, strategy: Box<dyn FusionStrategy>) -> Self {
        Self {
            potential,
            strategy,
            last_execution_time: 0.0,
        }
    }

    pub fn potential(&self) -> &RayPotential {
        &self.potential
    }

    /// Name of the active strategy (`"sequential"` or `"parallel"`).
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Fuse `views` into a grid described by `grid`.
    ///
    /// # Errors
    ///
    /// Checked in order, before any voxel is processed:
    /// [`FusionError::InvalidGeometry`], [`FusionError::NoEvidence`], then
    /// [`FusionError::InvalidView`] for the first malformed view.
    pub fn run(
        &mut self,
        grid: &VoxelGridDescriptor,
        views: &[CalibratedView],
    ) -> Result<ResultGrid, FusionError> {
        self.last_execution_time = 0.0;
        grid.validate()?;
        if views.is_empty() {
            return Err(FusionError::NoEvidence);
        }
        for (index, view) in views.iter().enumerate() {
            view.validate()
                .map_err(|source| FusionError::InvalidView { index, source })?;
        }

        let n = grid.voxel_count();
        debug!(
            "fusing {} views into {:?} voxels ({n} total) with {} strategy",
            views.len(),
            grid.dims,
            self.strategy.name()
        );

        let kernel = VoxelKernel::new(grid, views, self.potential);
        let mut potentials = vec![0.0; n];
        let mut counts = vec![0u32; n];

        let start = Instant::now();
        self.strategy.fuse(&kernel, &mut potentials, &mut counts);
        self.last_execution_time = start.elapsed().as_secs_f64();

        let result = ResultGrid::from_parts(grid.clone(), potentials, counts);
        let stats = result.stats();
        info!(
            "fused {} views: {}/{} voxels observed in {:.3}s",
            views.len(),
            stats.observed,
            stats.voxels,
            self.last_execution_time
        );
        Ok(result)
    }

    /// Wall-clock seconds of the voxel pass of the most recent run; 0 before
    /// any run and after a run that failed validation.
    pub fn last_execution_time(&self) -> Real {
        self.last_execution_time
    }
}
