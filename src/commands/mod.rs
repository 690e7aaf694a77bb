pub mod generate;
pub mod graph;
pub mod score;
pub mod view;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use criticality_graph::config::AnalysisConfig;
use criticality_graph::records::RecordStore;

/// Loads and validates `input`. `None` means there was nothing to analyse;
/// that has already been reported to the user.
fn load_records(config: &AnalysisConfig, input: &Path) -> Result<Option<RecordStore>> {
    let (store, report) = RecordStore::load(input, &config.import)
        .with_context(|| format!("failed to read comparison records from {}", input.display()))?;

    for rejection in &report.rejected {
        warn!("{rejection}");
    }

    if let Err(error) = store.require_records() {
        warn!(path = %input.display(), "{error}");
        eprintln!("Nothing to analyse: {} contains no usable comparison records.", input.display());
        return Ok(None);
    }

    Ok(Some(store))
}
