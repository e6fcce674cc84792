//! Dataset loading and result writing for `depthfuse`.
//!
//! - [`list`]: list files naming depth maps and calibrations,
//! - [`krtd`]: the KRTD camera format,
//! - [`depth`]: JSON and image depth maps,
//! - [`dataset`]: folder datasets built from the above,
//! - [`vts`]: VTK structured-grid output,
//! - [`report`] and [`config`]: JSON run reports and run configuration.

pub mod config;
pub mod dataset;
pub mod depth;
pub mod krtd;
pub mod list;
pub mod report;
pub mod vts;

pub use config::{load_json_file, GridConfig, ReconstructionConfig};
pub use dataset::{load_dataset, save_dataset, Dataset, DatasetConfig, SkippedView};
pub use depth::{load_depth_map, save_depth_map_json};
pub use krtd::{parse_krtd, read_krtd, write_krtd, KrtdError};
pub use list::{read_path_list, resolve_in_folder};
pub use report::{write_report, FusionReport};
pub use vts::write_structured_grid;
