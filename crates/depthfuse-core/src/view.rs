//! Calibrated views: one depth map together with the matrices that project
//! world points into it.

use crate::math::{has_affine_bottom_row, is_finite_matrix};
use crate::{DepthMap, Mat3, Mat4, ProjectiveCamera};
use thiserror::Error;

/// Reasons a calibrated view cannot take part in fusion.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    #[error("view has no depth map")]
    MissingDepthMap,
    #[error("view has no intrinsic matrix")]
    MissingIntrinsic,
    #[error("view has no pose matrix")]
    MissingPose,
    #[error("intrinsic matrix has non-finite entries")]
    NonFiniteIntrinsic,
    /// K must be invertible to map camera rays to pixels.
    #[error("intrinsic matrix is singular")]
    SingularIntrinsic,
    #[error("pose matrix has non-finite entries")]
    NonFinitePose,
    #[error("pose matrix bottom row must be [0, 0, 0, 1]")]
    NotRigidPose,
}

/// One depth map plus its 3×3 intrinsic matrix K and 4×4 world → camera pose.
///
/// Views are immutable once built. Use [`CalibratedView::new`] when all three
/// parts are at hand, or [`CalibratedViewBuilder`] when a loader fills them in
/// one at a time.
///
/// # Example
///
/// ```
/// use depthfuse_core::{CalibratedView, DepthMap, FxFyCxCySkew, Mat4};
///
/// let k = FxFyCxCySkew::new(500.0, 500.0, 32.0, 24.0).k_matrix();
/// let depth = DepthMap::filled(64, 48, 2.0).unwrap();
/// let view = CalibratedView::new(depth, k, Mat4::identity()).unwrap();
/// assert_eq!(view.depth_map().width(), 64);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedView {
    depth_map: DepthMap,
    intrinsic: Mat3,
    pose: Mat4,
}

impl CalibratedView {
    /// Construct and validate a view.
    ///
    /// # Errors
    ///
    /// Returns an error if a matrix has non-finite entries, K is singular, or
    /// the pose bottom row is not `[0, 0, 0, 1]`.
    pub fn new(depth_map: DepthMap, intrinsic: Mat3, pose: Mat4) -> Result<Self, ViewError> {
        let view = Self {
            depth_map,
            intrinsic,
            pose,
        };
        view.validate()?;
        Ok(view)
    }

    /// Check the matrix invariants.
    pub fn validate(&self) -> Result<(), ViewError> {
        if !is_finite_matrix(&self.intrinsic) {
            return Err(ViewError::NonFiniteIntrinsic);
        }
        if self.intrinsic.determinant() == 0.0 {
            return Err(ViewError::SingularIntrinsic);
        }
        if !is_finite_matrix(&self.pose) {
            return Err(ViewError::NonFinitePose);
        }
        if !has_affine_bottom_row(&self.pose) {
            return Err(ViewError::NotRigidPose);
        }
        Ok(())
    }

    pub fn depth_map(&self) -> &DepthMap {
        &self.depth_map
    }

    /// Intrinsic matrix K.
    pub fn intrinsic(&self) -> &Mat3 {
        &self.intrinsic
    }

    /// World → camera transform TR.
    pub fn pose(&self) -> &Mat4 {
        &self.pose
    }

    /// Projection model for this view.
    pub fn camera(&self) -> ProjectiveCamera {
        ProjectiveCamera::from_matrices(&self.intrinsic, &self.pose)
    }
}

/// Incremental construction of a [`CalibratedView`].
#[derive(Debug, Clone, Default)]
pub struct CalibratedViewBuilder {
    depth_map: Option<DepthMap>,
    intrinsic: Option<Mat3>,
    pose: Option<Mat4>,
}

impl CalibratedViewBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth_map(mut self, depth_map: DepthMap) -> Self {
        self.depth_map = Some(depth_map);
        self
    }

    pub fn intrinsic(mut self, k: Mat3) -> Self {
        self.intrinsic = Some(k);
        self
    }

    pub fn pose(mut self, pose: Mat4) -> Self {
        self.pose = Some(pose);
        self
    }

    /// Finish the view.
    ///
    /// # Errors
    ///
    /// Returns the first missing part, or any error from
    /// [`CalibratedView::new`].
    pub fn build(self) -> Result<CalibratedView, ViewError> {
        let depth_map = self.depth_map.ok_or(ViewError::MissingDepthMap)?;
        let intrinsic = self.intrinsic.ok_or(ViewError::MissingIntrinsic)?;
        let pose = self.pose.ok_or(ViewError::MissingPose)?;
        CalibratedView::new(depth_map, intrinsic, pose)
    }
}
