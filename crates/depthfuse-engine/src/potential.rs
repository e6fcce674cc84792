use crate::FusionError;
use depthfuse_core::Real;
use serde::{Deserialize, Serialize};

/// Clamped linear ray potential.
///
/// For a signed distance `d = ray_depth - observed_depth` (positive behind the
/// observed surface):
///
/// ```text
/// p(d) = rho * clamp(d / thickness, -1, 1)
/// ```
///
/// Voxels well in front of the surface (empty space) get `-rho`, voxels well
/// behind it saturate at `+rho`, and the band `|d| <= thickness` is a linear
/// ramp through `p(0) = 0`. The function is odd: `p(-d) = -p(d)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayPotential {
    thickness: Real,
    rho: Real,
}

impl RayPotential {
    /// # Errors
    ///
    /// [`FusionError::InvalidParameter`] if either value is non-positive or
    /// not finite.
    pub fn new(thickness: Real, rho: Real) -> Result<Self, FusionError> {
        Ok(Self {
            thickness: FusionError::check_parameter("thickness", thickness)?,
            rho: FusionError::check_parameter("rho", rho)?,
        })
    }

    #[inline]
    pub fn thickness(&self) -> Real {
        self.thickness
    }

    #[inline]
    pub fn rho(&self) -> Real {
        self.rho
    }

    /// Evaluate `p(d)`. `NaN` maps to 0.
    #[inline]
    pub fn evaluate(&self, d: Real) -> Real {
        if d.is_nan() {
            return 0.0;
        }
        self.rho * (d / self.thickness).clamp(-1.0, 1.0)
    }

    /// Largest magnitude the potential can take.
    #[inline]
    pub fn bound(&self) -> Real {
        self.rho
    }
}
