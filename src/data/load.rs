use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::dataset::Dataset;
use super::parse::parse_dataset;

const SAMPLE_DATASET: &str = r#"[
    {"name": "Apple Inc", "change": 62},
    {"name": "Microsoft", "change": 18.4},
    {"name": "Tesla Motors", "change": -34.2},
    {"name": "Amazon", "change": 27},
    {"name": "Meta Platforms", "change": 41.5},
    {"name": "Intel Corporation", "change": -12.8},
    {"name": "Nvidia", "change": 96},
    {"name": "Netflix", "change": 8.1},
    {"name": "Walt Disney Company", "change": -6.3},
    {"name": "Oracle", "change": 3.9},
    {"name": "Pfizer", "change": -21.7},
    {"name": "X", "change": -5}
]"#;

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file {}", path.display()))?;
    let dataset = parse_dataset(&raw)
        .with_context(|| format!("failed to parse dataset file {}", path.display()))?;

    info!(records = dataset.len(), path = path.display().to_string(); "Loaded dataset");
    Ok(dataset)
}

/// Bundled demo data used when no dataset file is given.
pub fn sample_dataset() -> Result<Dataset> {
    parse_dataset(SAMPLE_DATASET).context("bundled sample dataset is invalid")
}
