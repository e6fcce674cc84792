//! Folder-based datasets.
//!
//! A dataset folder holds two list files: one naming depth maps, one naming
//! `.krtd` files, paired line by line.

use crate::depth::{load_depth_map, save_depth_map_json};
use crate::krtd::{read_krtd, write_krtd};
use crate::list::{read_path_list, resolve_in_folder};
use anyhow::{ensure, Context, Result};
use depthfuse_core::{CalibratedView, CalibratedViewBuilder, Real};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where to find a dataset and how to decode it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub data_folder: PathBuf,
    /// List of depth-map files, relative to `data_folder`.
    pub depth_map_file: String,
    /// List of `.krtd` files, relative to `data_folder`.
    pub krt_file: String,
    /// Factor applied to every decoded depth sample.
    pub depth_scale: Real,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::new(),
            depth_map_file: "vtiList.txt".to_string(),
            krt_file: "kList.txt".to_string(),
            depth_scale: 1.0,
        }
    }
}

impl DatasetConfig {
    pub fn new(data_folder: impl Into<PathBuf>) -> Self {
        Self {
            data_folder: data_folder.into(),
            ..Self::default()
        }
    }
}

/// A view that was left out because its calibration could not be read.
#[derive(Debug, Clone)]
pub struct SkippedView {
    pub index: usize,
    pub krtd_path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub views: Vec<CalibratedView>,
    pub skipped: Vec<SkippedView>,
}

/// Load every view listed by `config`.
///
/// Views whose `.krtd` file cannot be read are skipped with a warning. A depth
/// map that cannot be decoded is an error, and so is a dataset with no views.
pub fn load_dataset(config: &DatasetConfig) -> Result<Dataset> {
    let folder = &config.data_folder;
    ensure!(!folder.as_os_str().is_empty(), "data folder is not set");
    let depth_list_path = folder.join(&config.depth_map_file);
    let krtd_list_path = folder.join(&config.krt_file);
    let depth_entries = read_path_list(&depth_list_path)?;
    let krtd_entries = read_path_list(&krtd_list_path)?;
    ensure!(
        depth_entries.len() == krtd_entries.len(),
        "{} lists {} depth maps but {} lists {} calibration files",
        depth_list_path.display(),
        depth_entries.len(),
        krtd_list_path.display(),
        krtd_entries.len()
    );

    let mut views = Vec::with_capacity(depth_entries.len());
    let mut skipped = Vec::new();
    for (index, (depth_entry, krtd_entry)) in depth_entries.iter().zip(&krtd_entries).enumerate() {
        let krtd_path = resolve_in_folder(folder, krtd_entry);
        let (k, pose) = match read_krtd(&krtd_path) {
            Ok(matrices) => matrices,
            Err(err) => {
                warn!("skipping view {index}: {err:#}");
                skipped.push(SkippedView {
                    index,
                    krtd_path,
                    reason: format!("{err:#}"),
                });
                continue;
            }
        };

        let depth_path = resolve_in_folder(folder, depth_entry);
        let depth_map = load_depth_map(&depth_path, config.depth_scale)?;
        debug!(
            "view {index}: {} ({}x{}, {} valid samples)",
            depth_path.display(),
            depth_map.width(),
            depth_map.height(),
            depth_map.valid_count()
        );

        let view = CalibratedViewBuilder::new()
            .depth_map(depth_map)
            .intrinsic(k)
            .pose(pose)
            .build()
            .with_context(|| format!("view {index} ({})", krtd_path.display()))?;
        views.push(view);
    }

    ensure!(
        !views.is_empty(),
        "no views could be loaded from {}",
        folder.display()
    );
    info!("{} depth maps loaded ({} skipped)", views.len(), skipped.len());
    Ok(Dataset { views, skipped })
}

/// Write `views` as a dataset folder readable by [`load_dataset`].
///
/// Depth maps are stored as JSON. Returns the matching config.
pub fn save_dataset(folder: &Path, views: &[CalibratedView]) -> Result<DatasetConfig> {
    fs::create_dir_all(folder)
        .with_context(|| format!("failed to create {}", folder.display()))?;
    let config = DatasetConfig::new(folder);
    let mut depth_list = String::new();
    let mut krtd_list = String::new();
    for (index, view) in views.iter().enumerate() {
        let depth_name = format!("depth_{index:04}.json");
        let krtd_name = format!("camera_{index:04}.krtd");
        save_depth_map_json(&folder.join(&depth_name), view.depth_map())?;
        write_krtd(&folder.join(&krtd_name), view.intrinsic(), view.pose())?;
        depth_list.push_str(&depth_name);
        depth_list.push('\n');
        krtd_list.push_str(&krtd_name);
        krtd_list.push('\n');
    }
    for (name, contents) in [
        (&config.depth_map_file, depth_list),
        (&config.krt_file, krtd_list),
    ] {
        let path = folder.join(name);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(config)
}
