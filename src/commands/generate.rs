use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use criticality_graph::config::AnalysisConfig;
use criticality_graph::export::{training_data_csv, training_data_json, write_text};
use criticality_graph::records::generate;

use crate::OutputFormat;

pub fn run(config: &AnalysisConfig, format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    let settings = &config.generate;
    let records = generate(settings.count, settings.seed, settings.extended_multiplier);
    info!(
        count = records.len(),
        seed = settings.seed,
        "generated synthetic comparisons"
    );

    let contents = match format {
        OutputFormat::Csv => training_data_csv(&records),
        OutputFormat::Json => training_data_json(&records).context("failed to encode records")?,
    };

    match output {
        Some(path) => {
            write_text(&path, &contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote training data");
        }
        None => print!("{contents}"),
    }

    Ok(())
}
