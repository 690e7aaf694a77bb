//! Analysis configuration.
//!
//! Every field has a default so a config file only needs the keys it wants to
//! override. Files are JSON, loaded with [`AnalysisConfig::load`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CriticalityError, Result};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub graph: GraphConfig,
    pub funding: FundingConfig,
    pub layout: LayoutConfig,
    pub import: ImportConfig,
    pub generate: GenerateConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Edges seen fewer times than this are dropped.
    pub min_edge_count: u32,
    pub largest_component_only: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            min_edge_count: 2,
            largest_component_only: false,
        }
    }
}

/// Inclusive lower bounds on the normalized score, highest tier first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierBoundaries {
    pub critical: f64,
    pub important: f64,
    pub moderate: f64,
    pub supporting: f64,
}

impl Default for TierBoundaries {
    fn default() -> Self {
        Self {
            critical: 80.0,
            important: 60.0,
            moderate: 40.0,
            supporting: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundingConfig {
    pub min_funding: f64,
    pub max_funding: f64,
    pub tiers: TierBoundaries,
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            min_funding: 5_000.0,
            max_funding: 100_000.0,
            tiers: TierBoundaries::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub repulsion: f32,
    pub central_gravity: f32,
    pub damping: f32,
    pub spring_length: f32,
    pub spring_strength: f32,
    pub max_frames: u32,
    pub perspective_distance: f32,
    pub rotate_sensitivity: f32,
    /// Half-width of the cube initial positions are scattered in.
    pub initial_spread: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 1200.0,
            central_gravity: 0.005,
            damping: 0.85,
            spring_length: 180.0,
            spring_strength: 0.02,
            max_frames: 300,
            perspective_distance: 800.0,
            rotate_sensitivity: 0.01,
            initial_spread: 250.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub lowercase_identifiers: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            lowercase_identifiers: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub count: usize,
    pub seed: u64,
    /// Use the interactive-tool multiplier range `[1, 50]` instead of `[1, 5]`.
    pub extended_multiplier: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            count: 100,
            seed: 42,
            extended_multiplier: false,
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|error| CriticalityError::io(path, error))?;
        let mut config: Self = serde_json::from_str(&raw)?;
        config.sanitize();
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn sanitize(&mut self) {
        if self.graph.min_edge_count == 0 {
            warn!("min_edge_count must be at least 1; using 1");
            self.graph.min_edge_count = 1;
        }
        if self.funding.max_funding < self.funding.min_funding {
            warn!(
                min = self.funding.min_funding,
                max = self.funding.max_funding,
                "max_funding below min_funding; swapping"
            );
            std::mem::swap(&mut self.funding.min_funding, &mut self.funding.max_funding);
        }
        if self.layout.max_frames == 0 {
            self.layout.max_frames = LayoutConfig::default().max_frames;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "graph": { "min_edge_count": 4 } }"#).unwrap();
        assert_eq!(config.graph.min_edge_count, 4);
        assert!(!config.graph.largest_component_only);
        assert_eq!(config.funding, FundingConfig::default());
        assert_eq!(config.layout.max_frames, 300);
    }

    #[test]
    fn sanitize_fixes_zero_edge_count_and_inverted_funding() {
        let mut config = AnalysisConfig::default();
        config.graph.min_edge_count = 0;
        config.funding.min_funding = 10.0;
        config.funding.max_funding = 1.0;
        config.sanitize();
        assert_eq!(config.graph.min_edge_count, 1);
        assert_eq!(config.funding.min_funding, 1.0);
        assert_eq!(config.funding.max_funding, 10.0);
    }

    #[test]
    fn load_reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "funding": { "max_funding": 50000 } }"#).unwrap();
        let config = AnalysisConfig::load(&path).unwrap();
        assert_eq!(config.funding.max_funding, 50_000.0);
        assert_eq!(config.funding.min_funding, 5_000.0);
    }
}
