//! Dense depth images.
//!
//! A depth map stores one principal-axis depth per pixel in row-major order
//! (`index = y * width + x`). Zero, negative and non-finite samples mean "no
//! depth" and are never returned by the accessors.

use crate::math::nearest_pixel;
use crate::{Pt2, Real};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while constructing a depth map.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DepthMapError {
    /// Width or height is zero.
    #[error("depth map dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },
    /// Number of samples does not match `width * height`.
    #[error("depth map {width}x{height} needs {expected} samples, got {actual}")]
    SampleCount {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// Raw serialized form, validated into a [`DepthMap`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DepthMapData {
    width: usize,
    height: usize,
    depths: Vec<Real>,
}

/// A `width x height` image of depth samples.
///
/// # Example
///
/// ```
/// use depthfuse_core::DepthMap;
///
/// let map = DepthMap::new(2, 1, vec![1.5, 0.0]).unwrap();
/// assert_eq!(map.sample(0, 0), Some(1.5));
/// assert_eq!(map.sample(1, 0), None); // zero means "no depth"
/// assert_eq!(map.sample(2, 0), None); // out of bounds
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DepthMapData", into = "DepthMapData")]
pub struct DepthMap {
    width: usize,
    height: usize,
    depths: Vec<Real>,
}

impl TryFrom<DepthMapData> for DepthMap {
    type Error = DepthMapError;

    fn try_from(data: DepthMapData) -> Result<Self, Self::Error> {
        DepthMap::new(data.width, data.height, data.depths)
    }
}

impl From<DepthMap> for DepthMapData {
    fn from(map: DepthMap) -> Self {
        Self {
            width: map.width,
            height: map.height,
            depths: map.depths,
        }
    }
}

impl DepthMap {
    /// Construct a depth map from row-major samples.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or the sample count does not
    /// match `width * height`.
    pub fn new(width: usize, height: usize, depths: Vec<Real>) -> Result<Self, DepthMapError> {
        if width == 0 || height == 0 {
            return Err(DepthMapError::EmptyDimensions { width, height });
        }
        let expected = width.saturating_mul(height);
        if depths.len() != expected {
            return Err(DepthMapError::SampleCount {
                width,
                height,
                expected,
                actual: depths.len(),
            });
        }
        Ok(Self {
            width,
            height,
            depths,
        })
    }

    /// A depth map with the same depth at every pixel.
    pub fn filled(width: usize, height: usize, depth: Real) -> Result<Self, DepthMapError> {
        Self::new(width, height, vec![depth; width.saturating_mul(height)])
    }

    /// Build a depth map by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, DepthMapError>
    where
        F: FnMut(usize, usize) -> Real,
    {
        let mut depths = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                depths.push(f(x, y));
            }
        }
        Self::new(width, height, depths)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw row-major samples, including invalid ones.
    pub fn as_slice(&self) -> &[Real] {
        &self.depths
    }

    /// Depth at integer pixel `(x, y)`.
    ///
    /// Returns `None` outside the image or when the stored sample is not a
    /// finite positive depth.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> Option<Real> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let d = self.depths[y * self.width + x];
        (d.is_finite() && d > 0.0).then_some(d)
    }

    /// Nearest-neighbour depth at a continuous pixel coordinate.
    ///
    /// See [`nearest_pixel`] for the bounds and rounding rule.
    #[inline]
    pub fn sample_nearest(&self, pixel: &Pt2) -> Option<Real> {
        let (x, y) = nearest_pixel(pixel, self.width, self.height)?;
        self.sample(x, y)
    }

    /// Number of pixels carrying a usable depth.
    pub fn valid_count(&self) -> usize {
        self.depths
            .iter()
            .filter(|d| d.is_finite() && **d > 0.0)
            .count()
    }

    /// Multiply every sample by `scale` (e.g. millimetres to metres).
    pub fn scaled(mut self, scale: Real) -> Self {
        self.depths.iter_mut().for_each(|d| *d *= scale);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_map_rejects_bad_sizes() {
        assert_eq!(
            DepthMap::new(0, 3, vec![]),
            Err(DepthMapError::EmptyDimensions {
                width: 0,
                height: 3
            })
        );
        assert!(matches!(
            DepthMap::new(2, 2, vec![1.0; 3]),
            Err(DepthMapError::SampleCount {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn invalid_samples_read_as_none() {
        let map = DepthMap::new(4, 1, vec![2.0, 0.0, -1.0, Real::NAN]).unwrap();
        assert_eq!(map.sample(0, 0), Some(2.0));
        assert_eq!(map.sample(1, 0), None);
        assert_eq!(map.sample(2, 0), None);
        assert_eq!(map.sample(3, 0), None);
        assert_eq!(map.valid_count(), 1);
    }

    #[test]
    fn row_major_layout() {
        let map = DepthMap::from_fn(3, 2, |x, y| 1.0 + x as Real + 10.0 * y as Real).unwrap();
        assert_eq!(map.sample(2, 0), Some(3.0));
        assert_eq!(map.sample(0, 1), Some(11.0));
        assert_eq!(map.sample_nearest(&Pt2::new(1.4, 0.6)), Some(12.0));
        assert_eq!(map.sample_nearest(&Pt2::new(2.6, 0.0)), Some(3.0));
        assert_eq!(map.sample_nearest(&Pt2::new(3.0, 0.0)), None);
        assert_eq!(map.sample_nearest(&Pt2::new(-0.2, 0.0)), None);
    }

    #[test]
    fn deserialization_validates_sample_count() {
        let ok: DepthMap =
            serde_json::from_str(r#"{"width":2,"height":1,"depths":[1.0,2.0]}"#).unwrap();
        assert_eq!(ok.sample(1, 0), Some(2.0));

        let bad = serde_json::from_str::<DepthMap>(r#"{"width":2,"height":2,"depths":[1.0]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn scaled_converts_units() {
        let map = DepthMap::filled(1, 1, 1500.0).unwrap().scaled(1e-3);
        assert_eq!(map.sample(0, 0), Some(1.5));
    }
}
