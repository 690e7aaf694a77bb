use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use criticality_graph::config::AnalysisConfig;
use criticality_graph::export::{priorities_csv, scores_csv, training_data_csv, write_text};
use criticality_graph::scoring::{funding_priorities, score_records};
use criticality_graph::util::{format_usd, round2};

pub fn run(
    config: &AnalysisConfig,
    input: &Path,
    export_dir: Option<PathBuf>,
    top: usize,
) -> Result<()> {
    let Some(store) = super::load_records(config, input)? else {
        return Ok(());
    };

    let scores = score_records(store.records());
    let priorities = funding_priorities(&scores, &config.funding);
    println!(
        "{} repositories, {} records, top raw score {:.2}",
        scores.len(),
        store.len(),
        scores.max_raw_score()
    );

    println!(
        "{:>4}  {:<40} {:<11} {:>8} {:>12}",
        "rank", "repository", "tier", "score", "funding"
    );
    for priority in priorities.iter().take(top) {
        println!(
            "{:>4}  {:<40} {:<11} {:>8.2} {:>12}",
            priority.rank,
            priority.repo,
            priority.tier.label(),
            round2(priority.normalized_score),
            format_usd(priority.recommended_funding)
        );
    }
    if priorities.len() > top {
        println!("... {} more", priorities.len() - top);
    }

    if let Some(dir) = export_dir {
        let tables = [
            ("training_data.csv", training_data_csv(store.records())),
            ("criticality_scores.csv", scores_csv(&scores)),
            ("funding_priorities.csv", priorities_csv(&priorities)),
        ];
        for (name, contents) in tables {
            let path = dir.join(name);
            write_text(&path, &contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        info!(dir = %dir.display(), "exported score tables");
    }

    Ok(())
}
