//! Criticality scoring and dependency-graph layout for pairwise repository
//! comparisons.

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod layout;
pub mod records;
pub mod scoring;
pub mod util;

pub use error::{CriticalityError, Result, ValidationError};
