//! Deterministic noise helpers for synthetic depth maps.
//!
//! The functions here avoid `thread_rng` and any RNG crate. This keeps
//! synthetic datasets stable across versions and platforms.

use crate::Real;

/// Deterministic uniform depth noise in `[-max_abs, +max_abs]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UniformDepthNoise {
    /// Base seed controlling the pseudo-random sequence.
    pub seed: u64,
    /// Maximum absolute depth perturbation (world units).
    pub max_abs: Real,
}

impl UniformDepthNoise {
    /// Sample a deterministic offset for a given `(view_idx, pixel_idx)` key.
    #[inline]
    pub fn sample(&self, view_idx: usize, pixel_idx: usize) -> Real {
        let max_abs = self.max_abs.abs();
        if max_abs == 0.0 {
            return 0.0;
        }
        let u = u64_to_unit_f64(splitmix64(mix_key(self.seed, view_idx, pixel_idx)));
        (u - 0.5) * 2.0 * max_abs
    }

    /// Perturb a depth sample. Invalid samples (zero or negative) are kept.
    #[inline]
    pub fn apply(&self, view_idx: usize, pixel_idx: usize, depth: Real) -> Real {
        if depth > 0.0 {
            (depth + self.sample(view_idx, pixel_idx)).max(Real::MIN_POSITIVE)
        } else {
            depth
        }
    }
}

#[inline]
fn mix_key(seed: u64, view_idx: usize, pixel_idx: usize) -> u64 {
    seed ^ (view_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (pixel_idx as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9)
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
fn u64_to_unit_f64(x: u64) -> Real {
    // Top 53 bits as a double in [0, 1).
    let mantissa = x >> 11;
    (mantissa as Real) * (1.0 / ((1u64 << 53) as Real))
}
