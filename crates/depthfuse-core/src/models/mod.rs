//! Camera model building blocks.
//!
//! A view projects a world point `p_w` in two stages:
//!
//! 1. pose: `p_c = R p_w + t` (world → camera, the upper 3×4 block of TR),
//! 2. intrinsics: `pixel = dehomogenize(K p_c)`.
//!
//! The depth used for fusion is `p_c.z`, the distance along the principal axis.

mod camera;
mod intrinsics;

pub use camera::*;
pub use intrinsics::*;
