use anyhow::{Context, Result};
use depthfuse_core::{Real, VoxelGridDescriptor};
use depthfuse_engine::{FusionConfig, FusionStats};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Machine-readable summary of one reconstruction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionReport {
    pub grid: VoxelGridDescriptor,
    pub fusion: FusionConfig,
    pub strategy: String,
    pub views_loaded: usize,
    pub views_skipped: usize,
    pub stats: FusionStats,
    /// Wall-clock seconds of the voxel pass.
    pub execution_time_s: Real,
}

pub fn write_report(path: &Path, report: &FusionReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("failed to write report {}", path.display()))
}
