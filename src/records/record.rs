use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of a comparison was judged more critical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl Choice {
    /// Wire value used by the training-data tables.
    pub fn code(self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1" | "1.0" | "A" | "a" => Some(Self::A),
            "2" | "2.0" | "B" | "b" => Some(Self::B),
            _ => None,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One judged pairwise comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub id: u64,
    pub repo_a: String,
    pub repo_b: String,
    pub parent: String,
    pub choice: Choice,
    /// As supplied; may be absent or non-finite on imported data.
    pub multiplier: Option<f64>,
    pub reasoning: Option<String>,
    pub timestamp: Option<String>,
    pub juror: Option<String>,
}

impl ComparisonRecord {
    pub fn new(
        id: u64,
        repo_a: impl Into<String>,
        repo_b: impl Into<String>,
        parent: impl Into<String>,
        choice: Choice,
        multiplier: f64,
    ) -> Self {
        Self {
            id,
            repo_a: repo_a.into(),
            repo_b: repo_b.into(),
            parent: parent.into(),
            choice,
            multiplier: Some(multiplier),
            reasoning: None,
            timestamp: None,
            juror: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// The multiplier used in aggregation; anything missing or non-finite
    /// counts as `1`.
    pub fn weight(&self) -> f64 {
        self.multiplier
            .filter(|value| value.is_finite())
            .unwrap_or(1.0)
    }

    pub fn has_usable_multiplier(&self) -> bool {
        self.multiplier.is_some_and(f64::is_finite)
    }

    pub fn winner(&self) -> &str {
        match self.choice {
            Choice::A => &self.repo_a,
            Choice::B => &self.repo_b,
        }
    }

    pub fn loser(&self) -> &str {
        match self.choice {
            Choice::A => &self.repo_b,
            Choice::B => &self.repo_a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_follows_choice() {
        let record = ComparisonRecord::new(0, "x/a", "x/b", "x/a", Choice::B, 2.0);
        assert_eq!(record.winner(), "x/b");
        assert_eq!(record.loser(), "x/a");
    }

    #[test]
    fn non_finite_multiplier_weighs_one() {
        let mut record = ComparisonRecord::new(0, "x/a", "x/b", "x/a", Choice::A, f64::NAN);
        assert_eq!(record.weight(), 1.0);
        record.multiplier = Some(f64::INFINITY);
        assert_eq!(record.weight(), 1.0);
        record.multiplier = None;
        assert_eq!(record.weight(), 1.0);
        record.multiplier = Some(3.5);
        assert_eq!(record.weight(), 3.5);
    }

    #[test]
    fn choice_accepts_numeric_and_letter_forms() {
        assert_eq!(Choice::parse("1"), Some(Choice::A));
        assert_eq!(Choice::parse(" 2 "), Some(Choice::B));
        assert_eq!(Choice::parse("b"), Some(Choice::B));
        assert_eq!(Choice::parse("3"), None);
    }
}
