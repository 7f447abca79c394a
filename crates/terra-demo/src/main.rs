//! Tessellates a polygon dataset and logs what came out.
//!
//! Configuration is loaded from `terra.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p terra-demo` for the built-in sample, or
//! `cargo run -p terra-demo -- coast.ron -n 32` for a dataset file.

mod dataset;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use terra_config::{CliArgs, Config, ConfigError, default_config_dir};
use terra_mesh::PackedGeoMesh;
use terra_tessellate::{Tessellation, TessellationError};
use tracing::{error, info, warn};

use crate::dataset::{Dataset, DatasetError};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load dataset: {0}")]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".terra"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config.log_dir(&config_dir);
    terra_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config, args.dataset.as_deref()) {
        Ok(tessellation) => {
            log_summary(&tessellation);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, dataset_path: Option<&Path>) -> Result<Tessellation, DemoError> {
    config.validate()?;

    let dataset = match dataset_path {
        Some(path) => {
            let dataset = Dataset::from_ron(path)?;
            info!(
                "Loaded {} records from {}",
                dataset.records.len(),
                path.display()
            );
            dataset
        }
        None => {
            info!("No dataset given, using the built-in sample");
            Dataset::sample()
        }
    };

    let tessellator = dataset.tessellator(&config.tessellation)?;
    info!(
        "Grid: {} x {} cells over {:?}",
        tessellator.subdivisions(),
        tessellator.subdivisions(),
        tessellator.sector()
    );
    Ok(tessellator.tessellate(&dataset.records)?)
}

fn log_summary(tessellation: &Tessellation) {
    let report = &tessellation.report;
    let mesh = &tessellation.mesh;

    info!(
        "Rings: {}, touched cells: {}, filled cells: {}",
        report.rings, report.touched_cells, report.filled_cells
    );
    info!(
        "Mesh: {} vertices, {} triangles, planar area {:.4}",
        mesh.positions.len(),
        mesh.triangle_count(),
        mesh.planar_area()
    );
    for (record, indices) in mesh.index_buffers().enumerate() {
        info!("Record {}: {} triangles", record, indices.len() / 3);
    }

    for failure in &report.failed_records {
        warn!("Record {} dropped: {}", failure.record, failure.error);
    }
    if report.anomalies.total() > 0 {
        warn!("Anomalies: {:?}", report.anomalies);
    }

    let packed = PackedGeoMesh::from_mesh(mesh);
    info!(
        "Packed: {} vertex bytes, {} index bytes",
        packed.vertex_buffer_bytes(),
        packed.index_buffer_bytes()
    );

    if report.is_clean() {
        info!("Tessellation completed cleanly");
    }
}
