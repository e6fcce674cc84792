//! Deterministic synthetic data generation helpers.
//!
//! This module provides small, reusable building blocks for constructing
//! synthetic fusion problems used in tests and demos:
//! - analytic surfaces (planes, spheres) ray-cast into depth maps,
//! - simple pose generators (look-at, orbits),
//! - deterministic pseudo-random depth noise.
//!
//! # Example
//!
//! ```
//! use depthfuse_core::synthetic::scene::{poses_orbit, render_views, Sphere};
//! use depthfuse_core::{FxFyCxCySkew, Pt3};
//!
//! let k = FxFyCxCySkew::new(60.0, 60.0, 32.0, 24.0).k_matrix();
//! let sphere = Sphere { center: Pt3::origin(), radius: 1.0 };
//! let poses = poses_orbit(4, &Pt3::origin(), 4.0, 0.0);
//! let views = render_views(&k, &poses, 64, 48, &sphere, None).unwrap();
//! assert_eq!(views.len(), 4);
//! ```

pub mod noise;
pub mod scene;
