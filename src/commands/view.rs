use std::path::PathBuf;

use anyhow::{Result, anyhow};

use criticality_graph::app::{CriticalityApp, DataSource};
use criticality_graph::config::AnalysisConfig;

pub fn run(config: AnalysisConfig, input: Option<PathBuf>) -> Result<()> {
    let source = match input {
        Some(path) => DataSource::File(path),
        None => DataSource::Synthetic {
            count: config.generate.count,
            seed: config.generate.seed,
            extended_multiplier: config.generate.extended_multiplier,
        },
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "criticality-graph",
        options,
        Box::new(move |cc| Ok(Box::new(CriticalityApp::new(cc, source, config)))),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}
