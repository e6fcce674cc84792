//! JSON configuration for a full reconstruction run.

use crate::dataset::DatasetConfig;
use anyhow::{Context, Result};
use depthfuse_core::{GridBasis, Pt3, Real, Vec3, VoxelGridDescriptor};
use depthfuse_engine::FusionConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Grid settings, each of which may also come from the command line.
///
/// Basis vectors default to the world axes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub dims: Option<[usize; 3]>,
    pub spacing: Option<[Real; 3]>,
    pub origin: Option<[Real; 3]>,
    pub vec_x: Option<[Real; 3]>,
    pub vec_y: Option<[Real; 3]>,
    pub vec_z: Option<[Real; 3]>,
}

impl GridConfig {
    /// Fill the fields of `self` that are unset from `base`.
    pub fn or(self, base: GridConfig) -> GridConfig {
        GridConfig {
            dims: self.dims.or(base.dims),
            spacing: self.spacing.or(base.spacing),
            origin: self.origin.or(base.origin),
            vec_x: self.vec_x.or(base.vec_x),
            vec_y: self.vec_y.or(base.vec_y),
            vec_z: self.vec_z.or(base.vec_z),
        }
    }

    /// Build the descriptor. Fails if dims, spacing or origin is missing.
    ///
    /// Geometry is not validated here; see [`VoxelGridDescriptor::validate`].
    pub fn resolve(&self) -> Result<VoxelGridDescriptor> {
        let dims = self.dims.context("grid dims are required (--grid-dims)")?;
        let spacing = self
            .spacing
            .context("grid spacing is required (--grid-spacing)")?;
        let origin = self
            .origin
            .context("grid origin is required (--grid-origin)")?;
        let basis = GridBasis::new(
            self.vec_x.map_or_else(Vec3::x, Vec3::from),
            self.vec_y.map_or_else(Vec3::y, Vec3::from),
            self.vec_z.map_or_else(Vec3::z, Vec3::from),
        );
        Ok(VoxelGridDescriptor::new(
            dims,
            Vec3::from(spacing),
            Pt3::from(origin),
            basis,
        ))
    }
}

/// Everything a reconstruction run needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    pub grid: GridConfig,
    pub dataset: DatasetConfig,
    pub fusion: FusionConfig,
    /// Output `.vts` path.
    pub output_grid: Option<PathBuf>,
    /// Optional JSON report path.
    pub report: Option<PathBuf>,
}

pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse JSON from {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: ReconstructionConfig = serde_json::from_str(
            r#"{
                "grid": {"dims": [10, 10, 10], "spacing": [0.1, 0.1, 0.1], "origin": [-0.5, -0.5, -0.5]},
                "dataset": {"data_folder": "/data"},
                "fusion": {"thickness": 0.05}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.dataset.krt_file, "kList.txt");
        assert_eq!(cfg.dataset.depth_map_file, "vtiList.txt");
        assert_eq!(cfg.fusion.rho, 3.0);
        assert_eq!(cfg.fusion.thickness, 0.05);
        let grid = cfg.grid.resolve().unwrap();
        assert_eq!(grid.basis, GridBasis::identity());
        assert_eq!(grid.voxel_count(), 1000);
    }

    #[test]
    fn command_line_values_override_file_values() {
        let file = GridConfig {
            dims: Some([4, 4, 4]),
            spacing: Some([1.0; 3]),
            origin: Some([0.0; 3]),
            ..GridConfig::default()
        };
        let flags = GridConfig {
            dims: Some([2, 2, 2]),
            vec_x: Some([0.0, 1.0, 0.0]),
            vec_y: Some([-1.0, 0.0, 0.0]),
            ..GridConfig::default()
        };
        let grid = flags.or(file).resolve().unwrap();
        assert_eq!(grid.dims, [2, 2, 2]);
        assert_eq!(grid.basis.x, Vec3::y());
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn missing_grid_values_are_reported() {
        let err = GridConfig::default().resolve().unwrap_err();
        assert!(err.to_string().contains("--grid-dims"));
    }
}
