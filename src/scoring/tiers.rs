use std::fmt;

use serde::Serialize;

use crate::config::{FundingConfig, TierBoundaries};

use super::scorer::{RepositoryScore, ScoreTable};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tier {
    Critical,
    Important,
    Moderate,
    Supporting,
    Peripheral,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Critical,
        Tier::Important,
        Tier::Moderate,
        Tier::Supporting,
        Tier::Peripheral,
    ];

    /// Every score maps to exactly one tier; anything below the supporting
    /// bound (including negatives and NaN) is peripheral.
    pub fn classify(normalized_score: f64, bounds: &TierBoundaries) -> Self {
        if normalized_score >= bounds.critical {
            Self::Critical
        } else if normalized_score >= bounds.important {
            Self::Important
        } else if normalized_score >= bounds.moderate {
            Self::Moderate
        } else if normalized_score >= bounds.supporting {
            Self::Supporting
        } else {
            Self::Peripheral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Important => "Important",
            Self::Moderate => "Moderate",
            Self::Supporting => "Supporting",
            Self::Peripheral => "Peripheral",
        }
    }

    pub fn funding_level(self) -> &'static str {
        match self {
            Self::Critical => "High Priority",
            Self::Important => "Medium-High Priority",
            Self::Moderate => "Medium Priority",
            Self::Supporting => "Low-Medium Priority",
            Self::Peripheral => "Low Priority",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FundingPriority {
    pub rank: usize,
    pub repo: String,
    pub normalized_score: f64,
    pub tier: Tier,
    pub recommended_funding: u64,
}

/// Linear interpolation between the configured funding bounds.
pub fn recommended_funding(normalized_score: f64, funding: &FundingConfig) -> u64 {
    let score = if normalized_score.is_nan() {
        0.0
    } else {
        normalized_score.clamp(0.0, 100.0)
    };
    let amount =
        score / 100.0 * (funding.max_funding - funding.min_funding) + funding.min_funding;
    amount.round().max(0.0) as u64
}

/// Assigns rank, tier and funding to scores already sorted by raw score.
pub fn classify_ranked<'a>(
    ranked: impl IntoIterator<Item = &'a RepositoryScore>,
    funding: &FundingConfig,
) -> Vec<FundingPriority> {
    ranked
        .into_iter()
        .enumerate()
        .map(|(index, score)| FundingPriority {
            rank: index + 1,
            repo: score.repo.clone(),
            normalized_score: score.normalized_score,
            tier: Tier::classify(score.normalized_score, &funding.tiers),
            recommended_funding: recommended_funding(score.normalized_score, funding),
        })
        .collect()
}

pub fn funding_priorities(table: &ScoreTable, funding: &FundingConfig) -> Vec<FundingPriority> {
    classify_ranked(table.ranked(), funding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Choice, ComparisonRecord};
    use crate::scoring::score_records;

    #[test]
    fn boundaries_are_inclusive_lower_bounds() {
        let bounds = TierBoundaries::default();
        assert_eq!(Tier::classify(100.0, &bounds), Tier::Critical);
        assert_eq!(Tier::classify(80.0, &bounds), Tier::Critical);
        assert_eq!(Tier::classify(79.999, &bounds), Tier::Important);
        assert_eq!(Tier::classify(60.0, &bounds), Tier::Important);
        assert_eq!(Tier::classify(40.0, &bounds), Tier::Moderate);
        assert_eq!(Tier::classify(20.0, &bounds), Tier::Supporting);
        assert_eq!(Tier::classify(19.99, &bounds), Tier::Peripheral);
        assert_eq!(Tier::classify(0.0, &bounds), Tier::Peripheral);
    }

    #[test]
    fn funding_interpolates_between_bounds() {
        let funding = FundingConfig::default();
        assert_eq!(recommended_funding(0.0, &funding), 5_000);
        assert_eq!(recommended_funding(100.0, &funding), 100_000);
        assert_eq!(recommended_funding(50.0, &funding), 52_500);
        assert_eq!(recommended_funding(8.0, &funding), 12_600);
        assert_eq!(recommended_funding(250.0, &funding), 100_000);
    }

    #[test]
    fn scenario_tiers() {
        let records = vec![
            ComparisonRecord::new(0, "X", "Y", "X", Choice::A, 2.0),
            ComparisonRecord::new(1, "Y", "X", "Y", Choice::B, 3.0),
        ];
        let priorities = funding_priorities(&score_records(&records), &FundingConfig::default());

        assert_eq!(priorities.len(), 2);
        assert_eq!(priorities[0].rank, 1);
        assert_eq!(priorities[0].repo, "X");
        assert_eq!(priorities[0].tier, Tier::Critical);
        assert_eq!(priorities[0].recommended_funding, 100_000);
        assert_eq!(priorities[1].repo, "Y");
        assert_eq!(priorities[1].tier, Tier::Peripheral);
        assert_eq!(priorities[1].tier.funding_level(), "Low Priority");
    }
}
