use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use depthfuse_core::Real;
use depthfuse_engine::FusionEngine;
use depthfuse_io::{
    load_dataset, load_json_file, write_report, write_structured_grid, FusionReport, GridConfig,
    ReconstructionConfig,
};
use log::info;
use tracing_subscriber::EnvFilter;

/// Fuse a folder of calibrated depth maps into a voxel grid of ray potentials.
#[derive(Debug, Parser)]
#[command(name = "depthfuse", author, version, about)]
struct Args {
    /// Number of voxels along each grid axis.
    #[arg(long, num_args = 3, value_names = ["NX", "NY", "NZ"])]
    grid_dims: Option<Vec<usize>>,

    /// Voxel spacing along each grid axis.
    #[arg(long, num_args = 3, value_names = ["SX", "SY", "SZ"])]
    grid_spacing: Option<Vec<Real>>,

    /// World position of voxel (0, 0, 0).
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    grid_origin: Option<Vec<Real>>,

    /// Grid X axis (default 1 0 0).
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    grid_vec_x: Option<Vec<Real>>,

    /// Grid Y axis (default 0 1 0).
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    grid_vec_y: Option<Vec<Real>>,

    /// Grid Z axis (default 0 0 1).
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    grid_vec_z: Option<Vec<Real>>,

    /// Folder containing the list files, depth maps and .krtd files.
    #[arg(long)]
    data_folder: Option<PathBuf>,

    /// List of depth-map files inside the data folder (default vtiList.txt).
    #[arg(long)]
    depth_map_file: Option<String>,

    /// List of .krtd files inside the data folder (default kList.txt).
    #[arg(long)]
    krt_file: Option<String>,

    /// Output .vts file.
    #[arg(long)]
    output_grid_filename: Option<PathBuf>,

    /// Half-width of the ray potential band (default 2).
    #[arg(long)]
    ray_thick: Option<Real>,

    /// Magnitude of the ray potential (default 3).
    #[arg(long)]
    ray_rho: Option<Real>,

    /// Use the single-threaded reference path.
    #[arg(long)]
    sequential: bool,

    /// Worker threads for the parallel path (default: all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Factor applied to decoded depth samples (default 1).
    #[arg(long)]
    depth_scale: Option<Real>,

    /// Write a JSON run report to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// JSON ReconstructionConfig; command-line values take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging.
    #[arg(long)]
    verbose: bool,
}

fn triple<T: Copy>(values: Option<Vec<T>>) -> Option<[T; 3]> {
    values.and_then(|v| v.try_into().ok())
}

impl Args {
    /// Apply command-line values on top of `base`.
    fn merge_into(&self, base: ReconstructionConfig) -> ReconstructionConfig {
        let mut cfg = base;
        let flags = GridConfig {
            dims: triple(self.grid_dims.clone()),
            spacing: triple(self.grid_spacing.clone()),
            origin: triple(self.grid_origin.clone()),
            vec_x: triple(self.grid_vec_x.clone()),
            vec_y: triple(self.grid_vec_y.clone()),
            vec_z: triple(self.grid_vec_z.clone()),
        };
        cfg.grid = flags.or(cfg.grid);

        if let Some(folder) = &self.data_folder {
            cfg.dataset.data_folder = folder.clone();
        }
        if let Some(name) = &self.depth_map_file {
            cfg.dataset.depth_map_file = name.clone();
        }
        if let Some(name) = &self.krt_file {
            cfg.dataset.krt_file = name.clone();
        }
        if let Some(scale) = self.depth_scale {
            cfg.dataset.depth_scale = scale;
        }
        if let Some(thickness) = self.ray_thick {
            cfg.fusion.thickness = thickness;
        }
        if let Some(rho) = self.ray_rho {
            cfg.fusion.rho = rho;
        }
        if self.sequential {
            cfg.fusion.parallel = false;
        }
        if self.threads.is_some() {
            cfg.fusion.threads = self.threads;
        }
        if self.output_grid_filename.is_some() {
            cfg.output_grid = self.output_grid_filename.clone();
        }
        if self.report.is_some() {
            cfg.report = self.report.clone();
        }
        cfg
    }

    fn resolve_config(&self) -> Result<ReconstructionConfig> {
        let base = match &self.config {
            Some(path) => load_json_file::<ReconstructionConfig>(path)?,
            None => ReconstructionConfig::default(),
        };
        Ok(self.merge_into(base))
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second initialisation (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Load, fuse and write. Returns the run report.
fn run_reconstruction(config: &ReconstructionConfig) -> Result<FusionReport> {
    let grid = config.grid.resolve()?;
    grid.validate().context("invalid grid")?;
    ensure!(
        !config.dataset.data_folder.as_os_str().is_empty(),
        "a data folder is required (--data-folder)"
    );
    let output = config
        .output_grid
        .as_deref()
        .context("an output file is required (--output-grid-filename)")?;
    let mut engine = FusionEngine::from_config(&config.fusion)?;

    info!("reading depth maps and calibrations...");
    let dataset = load_dataset(&config.dataset)?;

    info!(
        "fusing {} views into {}x{}x{} voxels ({})",
        dataset.views.len(),
        grid.dims[0],
        grid.dims[1],
        grid.dims[2],
        engine.strategy_name()
    );
    let result = engine.run(&grid, &dataset.views)?;

    write_structured_grid(output, &result)?;
    info!("wrote {}", output.display());

    let report = FusionReport {
        grid,
        fusion: config.fusion,
        strategy: engine.strategy_name().to_string(),
        views_loaded: dataset.views.len(),
        views_skipped: dataset.skipped.len(),
        stats: result.stats(),
        execution_time_s: engine.last_execution_time(),
    };
    if let Some(path) = &config.report {
        write_report(path, &report)?;
    }
    Ok(report)
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = args.resolve_config()?;
    let report = run_reconstruction(&config)?;
    println!("Execution time: {:.6} s", report.execution_time_s);
    Ok(())
}
