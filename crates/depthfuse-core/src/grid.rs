//! Regular voxel grids and their placement in world space.
//!
//! A grid is described by its voxel counts, per-axis spacing, the world
//! position of voxel `(0, 0, 0)` and an orientation basis of three mutually
//! orthogonal vectors. The centre of voxel `(i, j, k)` is
//!
//! ```text
//! origin + B * (i * sx, j * sy, k * sz)
//! ```
//!
//! where the rows of `B` are the basis vectors X, Y and Z.

use crate::math::are_orthogonal;
use crate::{Mat3, Mat4, Pt3, Real, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Relative tolerance used when checking the basis for orthogonality.
pub const ORTHOGONALITY_TOLERANCE: Real = 1e-9;

/// Largest voxel count a grid may have: one `Real` per voxel must be
/// addressable.
pub const MAX_VOXELS: usize = isize::MAX as usize / std::mem::size_of::<Real>();

const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// Geometric problems with a voxel grid description.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    /// Two basis vectors have a non-zero dot product.
    #[error("grid basis vectors {first} and {second} are not orthogonal (dot = {dot})")]
    NonOrthogonal {
        first: &'static str,
        second: &'static str,
        dot: Real,
    },
    /// A basis vector is zero or not finite.
    #[error("grid basis vector {axis} is degenerate")]
    DegenerateAxis { axis: &'static str },
    #[error("grid dimension along {axis} must be positive")]
    ZeroDimension { axis: &'static str },
    #[error("grid spacing along {axis} must be positive and finite, got {value}")]
    InvalidSpacing { axis: &'static str, value: Real },
    #[error("grid origin must be finite")]
    NonFiniteOrigin,
    /// `nx * ny * nz` does not fit in memory addressing.
    #[error("grid of {dims:?} voxels is too large")]
    TooManyVoxels { dims: [usize; 3] },
}

/// Orientation of the grid axes in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBasis {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl Default for GridBasis {
    fn default() -> Self {
        Self::identity()
    }
}

impl GridBasis {
    pub fn new(x: Vec3, y: Vec3, z: Vec3) -> Self {
        Self { x, y, z }
    }

    /// The canonical world axes.
    pub fn identity() -> Self {
        Self::new(Vec3::x(), Vec3::y(), Vec3::z())
    }

    /// Basis vectors as rows of a 3×3 matrix.
    pub fn rows(&self) -> Mat3 {
        Mat3::from_rows(&[
            self.x.transpose(),
            self.y.transpose(),
            self.z.transpose(),
        ])
    }

    /// 4×4 orientation matrix: basis vectors in the first three rows,
    /// identity elsewhere.
    pub fn matrix(&self) -> Mat4 {
        let mut m = Mat4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rows());
        m
    }

    /// Apply the orientation to a grid-aligned offset.
    #[inline]
    pub fn apply(&self, offset: &Vec3) -> Vec3 {
        Vec3::new(self.x.dot(offset), self.y.dot(offset), self.z.dot(offset))
    }

    /// Check that the vectors are non-degenerate and pairwise orthogonal.
    pub fn validate(&self) -> Result<(), GridError> {
        for (axis, v) in AXIS_NAMES.iter().zip([&self.x, &self.y, &self.z]) {
            if !v.iter().all(|c| c.is_finite()) || v.norm() == 0.0 {
                return Err(GridError::DegenerateAxis { axis });
            }
        }
        let pairs = [
            ("x", &self.x, "y", &self.y),
            ("y", &self.y, "z", &self.z),
            ("z", &self.z, "x", &self.x),
        ];
        for (first, a, second, b) in pairs {
            if !are_orthogonal(a, b, ORTHOGONALITY_TOLERANCE) {
                return Err(GridError::NonOrthogonal {
                    first,
                    second,
                    dot: a.dot(b),
                });
            }
        }
        Ok(())
    }
}

/// Dimensions, spacing, origin and orientation of the output volume.
///
/// # Example
///
/// ```
/// use depthfuse_core::{GridBasis, Pt3, Vec3, VoxelGridDescriptor};
///
/// let grid = VoxelGridDescriptor::new(
///     [4, 4, 2],
///     Vec3::new(0.5, 0.5, 1.0),
///     Pt3::new(-1.0, -1.0, 0.0),
///     GridBasis::identity(),
/// );
/// assert!(grid.validate().is_ok());
/// assert_eq!(grid.voxel_count(), 32);
/// assert_eq!(grid.voxel_center(2, 0, 1), Pt3::new(0.0, -1.0, 1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelGridDescriptor {
    pub dims: [usize; 3],
    pub spacing: Vec3,
    pub origin: Pt3,
    #[serde(default)]
    pub basis: GridBasis,
}

impl VoxelGridDescriptor {
    pub fn new(dims: [usize; 3], spacing: Vec3, origin: Pt3, basis: GridBasis) -> Self {
        Self {
            dims,
            spacing,
            origin,
            basis,
        }
    }

    /// Check dimensions, spacing, origin and basis.
    pub fn validate(&self) -> Result<(), GridError> {
        for (axis, &n) in AXIS_NAMES.iter().zip(self.dims.iter()) {
            if n == 0 {
                return Err(GridError::ZeroDimension { axis });
            }
        }
        for (axis, &s) in AXIS_NAMES.iter().zip(self.spacing.iter()) {
            if !(s.is_finite() && s > 0.0) {
                return Err(GridError::InvalidSpacing { axis, value: s });
            }
        }
        match self.checked_voxel_count() {
            Some(n) if n <= MAX_VOXELS => {}
            _ => return Err(GridError::TooManyVoxels { dims: self.dims }),
        }
        if !self.origin.iter().all(|c| c.is_finite()) {
            return Err(GridError::NonFiniteOrigin);
        }
        self.basis.validate()
    }

    /// `nx * ny * nz`, or `None` on overflow.
    pub fn checked_voxel_count(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }

    /// Total number of voxels, saturating at `usize::MAX`.
    ///
    /// Exact for any grid that passes [`VoxelGridDescriptor::validate`].
    pub fn voxel_count(&self) -> usize {
        self.checked_voxel_count().unwrap_or(usize::MAX)
    }

    /// Linear index of voxel `(i, j, k)`; x varies fastest.
    #[inline]
    pub fn linear_index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.dims[0] * (j + self.dims[1] * k)
    }

    /// Inverse of [`VoxelGridDescriptor::linear_index`].
    #[inline]
    pub fn grid_index(&self, linear: usize) -> [usize; 3] {
        let [nx, ny, _] = self.dims;
        [linear % nx, (linear / nx) % ny, linear / (nx * ny)]
    }

    /// World-space centre of voxel `(i, j, k)`.
    #[inline]
    pub fn voxel_center(&self, i: usize, j: usize, k: usize) -> Pt3 {
        let offset = Vec3::new(
            i as Real * self.spacing.x,
            j as Real * self.spacing.y,
            k as Real * self.spacing.z,
        );
        self.origin + self.basis.apply(&offset)
    }

    /// World-space centre of the voxel with the given linear index.
    #[inline]
    pub fn voxel_center_linear(&self, linear: usize) -> Pt3 {
        let [i, j, k] = self.grid_index(linear);
        self.voxel_center(i, j, k)
    }

    /// World-space centres of all voxels in linear-index order.
    pub fn voxel_centers(&self) -> impl Iterator<Item = Pt3> + '_ {
        (0..self.voxel_count()).map(move |n| self.voxel_center_linear(n))
    }
}
