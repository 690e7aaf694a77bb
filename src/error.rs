use std::path::PathBuf;

use thiserror::Error;

/// Why a single incoming record was rejected. Rejected records are dropped
/// from the batch; they never abort an ingest.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("row {row}: missing required field `{field}`")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: repo_a and repo_b are both `{repo}`")]
    SameRepository { row: usize, repo: String },

    #[error("row {row}: choice `{value}` is not 1, 2, A or B")]
    InvalidChoice { row: usize, value: String },

    #[error("row {row}: multiplier `{value}` is not a number")]
    InvalidMultiplier { row: usize, value: String },

    #[error("row {row}: id {id} already used in this batch")]
    DuplicateId { row: usize, id: u64 },

    #[error("row {row}: expected an object with record fields")]
    Malformed { row: usize },
}

#[derive(Debug, Error)]
pub enum CriticalityError {
    #[error("no comparison records to analyse")]
    EmptyInput,

    #[error("malformed CSV at line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("unsupported input format for {path}; expected .csv or .json")]
    UnknownFormat { path: PathBuf },

    #[error("invalid JSON input")]
    Json(#[from] serde_json::Error),

    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CriticalityError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CriticalityError> = std::result::Result<T, E>;
