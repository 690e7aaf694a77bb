use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{CriticalityError, Result};
use crate::graph::DependencyGraph;
use crate::layout::{LayoutSession, Phase, Vec3};
use crate::records::csv::{self, write_row};
use crate::records::ComparisonRecord;
use crate::scoring::{FundingPriority, ScoreTable};

pub const TRAINING_DATA_HEADER: [&str; 9] = [
    "id",
    "repo_a",
    "repo_b",
    "parent",
    "choice",
    "multiplier",
    "reasoning",
    "timestamp",
    "juror",
];
pub const SCORES_HEADER: [&str; 6] = [
    "rank",
    "repo",
    "normalizedScore",
    "winRate",
    "avgMultiplier",
    "totalComparisons",
];
pub const PRIORITIES_HEADER: [&str; 6] = [
    "rank",
    "repo",
    "tier",
    "criticalityScore",
    "fundingLevel",
    "recommendedFunding",
];

fn decimal(value: f64) -> String {
    format!("{value:.2}")
}

pub fn training_data_csv(records: &[ComparisonRecord]) -> String {
    let mut out = String::new();
    write_row(&mut out, &TRAINING_DATA_HEADER);
    for record in records {
        let multiplier = record
            .multiplier
            .filter(|value| value.is_finite())
            .map(|value| value.to_string())
            .unwrap_or_default();
        write_row(
            &mut out,
            &[
                record.id.to_string(),
                record.repo_a.clone(),
                record.repo_b.clone(),
                record.parent.clone(),
                record.choice.to_string(),
                multiplier,
                record.reasoning.clone().unwrap_or_default(),
                record.timestamp.clone().unwrap_or_default(),
                record.juror.clone().unwrap_or_default(),
            ],
        );
    }
    out
}

pub fn training_data_json(records: &[ComparisonRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Ranked score table, highest raw score first.
pub fn scores_csv(table: &ScoreTable) -> String {
    let mut out = String::new();
    write_row(&mut out, &SCORES_HEADER);
    for (index, score) in table.ranked().into_iter().enumerate() {
        write_row(
            &mut out,
            &[
                (index + 1).to_string(),
                score.repo.clone(),
                decimal(score.normalized_score),
                decimal(score.win_rate),
                decimal(score.avg_multiplier),
                score.total_comparisons.to_string(),
            ],
        );
    }
    out
}

pub fn priorities_csv(priorities: &[FundingPriority]) -> String {
    let mut out = String::new();
    write_row(&mut out, &PRIORITIES_HEADER);
    for priority in priorities {
        write_row(
            &mut out,
            &[
                priority.rank.to_string(),
                priority.repo.clone(),
                priority.tier.label().to_owned(),
                decimal(priority.normalized_score),
                priority.tier.funding_level().to_owned(),
                priority.recommended_funding.to_string(),
            ],
        );
    }
    out
}

/// One row of an exported score table.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRow {
    pub rank: usize,
    pub repo: String,
    pub normalized_score: f64,
    pub win_rate: f64,
    pub avg_multiplier: f64,
    pub total_comparisons: u32,
}

/// Parses a table written by [`scores_csv`]. Columns are located by header
/// name so reordered tables still load.
pub fn read_score_table(input: &str) -> Result<Vec<ScoreRow>> {
    let mut rows = csv::parse(input)?.into_iter();
    let Some((header_line, header)) = rows.next() else {
        return Ok(Vec::new());
    };

    let column = |name: &str| {
        header
            .iter()
            .position(|field| field.trim() == name)
            .ok_or_else(|| CriticalityError::Csv {
                line: header_line,
                message: format!("missing column `{name}`"),
            })
    };
    let rank_column = column("rank")?;
    let repo_column = column("repo")?;
    let normalized_column = column("normalizedScore")?;
    let win_rate_column = column("winRate")?;
    let multiplier_column = column("avgMultiplier")?;
    let total_column = column("totalComparisons")?;

    rows.map(|(line, fields)| {
        let field = |index: usize| fields.get(index).map(|value| value.trim()).unwrap_or("");
        let number = |index: usize| {
            field(index)
                .parse::<f64>()
                .map_err(|_| CriticalityError::Csv {
                    line,
                    message: format!("`{}` is not a number", field(index)),
                })
        };
        let integer = |index: usize| {
            field(index)
                .parse::<u64>()
                .map_err(|_| CriticalityError::Csv {
                    line,
                    message: format!("`{}` is not an integer", field(index)),
                })
        };

        Ok(ScoreRow {
            rank: integer(rank_column)? as usize,
            repo: field(repo_column).to_owned(),
            normalized_score: number(normalized_column)?,
            win_rate: number(win_rate_column)?,
            avg_multiplier: number(multiplier_column)?,
            total_comparisons: integer(total_column)? as u32,
        })
    })
    .collect()
}

#[derive(Serialize)]
struct NodeDocument<'a> {
    id: &'a str,
    label: &'a str,
    importance: f64,
    size: f64,
    position: Vec3,
}

#[derive(Serialize)]
struct EdgeDocument<'a> {
    source: &'a str,
    target: &'a str,
    count: u32,
    avg_multiplier: f64,
    width: f64,
}

#[derive(Serialize)]
struct GraphDocument<'a> {
    phase: Phase,
    nodes: Vec<NodeDocument<'a>>,
    edges: Vec<EdgeDocument<'a>>,
}

/// Graph plus the session's current node positions as pretty JSON.
pub fn graph_json(graph: &DependencyGraph, session: &LayoutSession) -> Result<String> {
    let positions = session.nodes();
    let nodes = graph
        .nodes
        .iter()
        .map(|node| NodeDocument {
            id: &node.id,
            label: &node.label,
            importance: node.importance,
            size: node.size,
            position: positions
                .iter()
                .find(|placed| placed.id == node.id)
                .map(|placed| placed.position)
                .unwrap_or_default(),
        })
        .collect();
    let edges = graph
        .edges
        .iter()
        .map(|edge| EdgeDocument {
            source: &edge.source,
            target: &edge.target,
            count: edge.count,
            avg_multiplier: edge.avg_multiplier(),
            width: edge.width(),
        })
        .collect();

    let document = GraphDocument {
        phase: session.phase(),
        nodes,
        edges,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| CriticalityError::io(parent, source))?;
    }
    fs::write(path, contents).map_err(|source| CriticalityError::io(path, source))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FundingConfig, GraphConfig, LayoutConfig};
    use crate::graph::build_graph;
    use crate::records::Choice;
    use crate::scoring::{funding_priorities, score_records};

    fn scenario() -> Vec<ComparisonRecord> {
        vec![
            ComparisonRecord::new(0, "x", "y", "x", Choice::A, 2.0),
            ComparisonRecord::new(1, "y", "x", "x", Choice::B, 3.0),
        ]
    }

    #[test]
    fn training_data_keeps_full_multiplier_precision() {
        let records = vec![
            ComparisonRecord::new(0, "a/x", "a/y", "a/x", Choice::A, 2.345),
            ComparisonRecord::new(1, "a/y", "a/x", "a/x", Choice::A, 1.0 / 3.0),
        ];
        let csv = training_data_csv(&records);
        assert!(csv.contains(",2.345,"));

        let reimported = crate::records::parse_csv_records(&csv, &Default::default())
            .unwrap()
            .into_iter()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(reimported, records);
        assert_eq!(score_records(&reimported), score_records(&records));
    }

    #[test]
    fn training_data_quotes_awkward_fields() {
        let mut record =
            ComparisonRecord::new(7, "a/b", "c/d", "e/f", Choice::B, 1.5).with_reasoning("fast, \"safe\"");
        record.juror = Some("juror-1".to_owned());
        let csv = training_data_csv(&[record]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,repo_a,repo_b,parent,choice,multiplier,reasoning,timestamp,juror")
        );
        assert_eq!(
            lines.next(),
            Some("7,a/b,c/d,e/f,2,1.5,\"fast, \"\"safe\"\"\",,juror-1")
        );
    }

    #[test]
    fn scores_table_is_ranked_with_two_decimals() {
        let csv = scores_csv(&score_records(&scenario()));
        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "rank,repo,normalizedScore,winRate,avgMultiplier,totalComparisons");
        assert_eq!(lines[1], "1,x,100.00,1.00,2.50,2");
        assert_eq!(lines[2], "2,y,8.00,0.00,0.00,2");
    }

    #[test]
    fn priorities_table_lists_tier_and_funding() {
        let priorities = funding_priorities(&score_records(&scenario()), &FundingConfig::default());
        let csv = priorities_csv(&priorities);
        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(lines[1], "1,x,Critical,100.00,High Priority,100000");
        assert_eq!(lines[2], "2,y,Peripheral,8.00,Low Priority,12600");
    }

    #[test]
    fn score_table_round_trips() {
        let table = score_records(&scenario());
        let rows = read_score_table(&scores_csv(&table)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].repo, "x");
        assert_eq!(rows[0].normalized_score, 100.0);
        assert_eq!(rows[1].normalized_score, 8.0);
        assert_eq!(rows[1].total_comparisons, 2);
    }

    #[test]
    fn score_table_rejects_missing_column() {
        let err = read_score_table("rank,repo\n1,x\n").unwrap_err();
        assert!(matches!(err, CriticalityError::Csv { line: 1, .. }));
    }

    #[test]
    fn graph_json_includes_positions() {
        let records = vec![
            ComparisonRecord::new(0, "x", "y", "p", Choice::A, 1.0),
            ComparisonRecord::new(1, "x", "y", "p", Choice::A, 1.0),
        ];
        let graph = build_graph(&records, &GraphConfig::default());
        let mut session = LayoutSession::from_graph(&graph, LayoutConfig::default());
        session.settle();

        let json = graph_json(&graph, &session).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"]["state"], "settled");
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["edges"][0]["count"], 2);
        assert!(value["nodes"][0]["position"]["x"].is_number());
    }

    #[test]
    fn write_text_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.csv");
        write_text(&path, "rank\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "rank\n");
    }
}
