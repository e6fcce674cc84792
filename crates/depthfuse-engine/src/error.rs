use depthfuse_core::{GridError, Real, ViewError};
use thiserror::Error;

/// Errors reported by the fusion engine.
///
/// Every variant is detected before any voxel is processed, so a failed run
/// never yields a partial grid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FusionError {
    /// A ray-potential parameter is non-positive or not finite.
    #[error("invalid parameter {name}: {value} (must be finite and > 0)")]
    InvalidParameter { name: &'static str, value: Real },
    #[error("invalid grid geometry: {0}")]
    InvalidGeometry(#[from] GridError),
    #[error("view {index} is invalid: {source}")]
    InvalidView {
        index: usize,
        #[source]
        source: ViewError,
    },
    /// No views were supplied.
    #[error("no views to fuse")]
    NoEvidence,
}

impl FusionError {
    pub(crate) fn check_parameter(name: &'static str, value: Real) -> Result<Real, Self> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(Self::InvalidParameter { name, value })
        }
    }
}
