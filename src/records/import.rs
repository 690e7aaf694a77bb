use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::ImportConfig;
use crate::error::{CriticalityError, Result, ValidationError};

use super::csv;
use super::record::{Choice, ComparisonRecord};

/// A parsed row: either a well-formed record or the reason it was rejected.
pub type Candidate = std::result::Result<ComparisonRecord, ValidationError>;

/// A converted row and the id it carried, if any.
type Converted = std::result::Result<(Option<u64>, ComparisonRecord), ValidationError>;

#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, alias = "repoA")]
    repo_a: Option<Value>,
    #[serde(default, alias = "repoB")]
    repo_b: Option<Value>,
    #[serde(default)]
    parent: Option<Value>,
    #[serde(default)]
    choice: Option<Value>,
    #[serde(default)]
    multiplier: Option<Value>,
    #[serde(default)]
    reasoning: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(default)]
    juror: Option<Value>,
}

pub fn read_records(path: &Path, config: &ImportConfig) -> Result<Vec<Candidate>> {
    let raw = fs::read_to_string(path).map_err(|error| CriticalityError::io(path, error))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let candidates = match extension.as_deref() {
        Some("csv") => parse_csv_records(&raw, config)?,
        Some("json") => parse_json_records(&raw, config)?,
        _ => {
            return Err(CriticalityError::UnknownFormat {
                path: path.to_path_buf(),
            });
        }
    };

    debug!(path = %path.display(), rows = candidates.len(), "parsed comparison file");
    Ok(candidates)
}

pub fn parse_json_records(raw: &str, config: &ImportConfig) -> Result<Vec<Candidate>> {
    let parsed: Value = serde_json::from_str(raw)?;
    let items = match parsed {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("records") {
            Some(Value::Array(items)) => items,
            _ => vec![Value::Object(object)],
        },
        other => vec![other],
    };

    let rows: Vec<Converted> = items
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let row = index + 1;
            let raw = RawRecord::deserialize(value)
                .map_err(|_| ValidationError::Malformed { row })?;
            convert(raw, row, config)
        })
        .collect();
    Ok(assign_missing_ids(rows))
}

pub fn parse_csv_records(raw: &str, config: &ImportConfig) -> Result<Vec<Candidate>> {
    let mut rows = csv::parse(raw)?.into_iter();
    let Some((_, header)) = rows.next() else {
        return Ok(Vec::new());
    };
    let header = header
        .iter()
        .map(|name| name.trim().to_owned())
        .collect::<Vec<_>>();

    let rows: Vec<Converted> = rows
        .enumerate()
        .map(|(index, (_line, fields))| {
            let row = index + 1;
            let mut object = Map::new();
            for (name, value) in header.iter().zip(fields) {
                if !value.trim().is_empty() {
                    object.insert(name.clone(), Value::String(value));
                }
            }
            let raw = RawRecord::deserialize(Value::Object(object))
                .map_err(|_| ValidationError::Malformed { row })?;
            convert(raw, row, config)
        })
        .collect();
    Ok(assign_missing_ids(rows))
}

/// Numbers rows without an id upwards from the largest id present in the
/// batch, so an assigned id never collides with one written in the input.
fn assign_missing_ids(rows: Vec<Converted>) -> Vec<Candidate> {
    let mut next_id = rows
        .iter()
        .filter_map(|row| row.as_ref().ok()?.0)
        .max()
        .map_or(0, |max| max.saturating_add(1));

    rows.into_iter()
        .map(|row| {
            row.map(|(id, mut record)| {
                record.id = id.unwrap_or_else(|| {
                    let assigned = next_id;
                    next_id = next_id.saturating_add(1);
                    assigned
                });
                record
            })
        })
        .collect()
}

fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn convert(raw: RawRecord, row: usize, config: &ImportConfig) -> Converted {
    let repo = |value: Option<Value>, field: &'static str| {
        text(value)
            .map(|value| normalize_repo(&value, config.lowercase_identifiers))
            .filter(|value| !value.is_empty())
            .ok_or(ValidationError::MissingField { row, field })
    };

    let repo_a = repo(raw.repo_a, "repo_a")?;
    let repo_b = repo(raw.repo_b, "repo_b")?;
    let parent = repo(raw.parent, "parent")?;

    let choice_text = text(raw.choice).ok_or(ValidationError::MissingField {
        row,
        field: "choice",
    })?;
    let choice = Choice::parse(&choice_text).ok_or(ValidationError::InvalidChoice {
        row,
        value: choice_text,
    })?;

    let multiplier = match text(raw.multiplier) {
        Some(value) => Some(
            value
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidMultiplier { row, value })?,
        ),
        None => None,
    };

    let id = text(raw.id).and_then(|value| value.parse::<u64>().ok());

    let record = ComparisonRecord {
        id: 0,
        repo_a,
        repo_b,
        parent,
        choice,
        multiplier,
        reasoning: text(raw.reasoning),
        timestamp: text(raw.timestamp),
        juror: text(raw.juror),
    };
    Ok((id, record))
}

/// Reduces a repository reference to `owner/name`: trims whitespace and
/// trailing slashes and strips GitHub URL prefixes and `.git` suffixes.
pub fn normalize_repo(value: &str, lowercase: bool) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    let normalized = match github_path(trimmed) {
        Some(path) => path,
        None => trimmed.to_owned(),
    };

    if lowercase {
        normalized.to_lowercase()
    } else {
        normalized
    }
}

fn github_path(value: &str) -> Option<String> {
    let without_scheme = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value);
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    let path = without_www.strip_prefix("github.com/")?;

    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    let owner = segments.next()?;
    let name = segments.next()?;
    let name = name.strip_suffix(".git").unwrap_or(name);
    Some(format!("{owner}/{name}"))
}
