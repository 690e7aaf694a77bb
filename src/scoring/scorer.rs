use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::records::ComparisonRecord;
use crate::util::round2;

const WIN_POINTS: f64 = 10.0;
const LOSS_POINTS: f64 = 2.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RepositoryScore {
    pub repo: String,
    pub raw_score: f64,
    /// Unrounded; tiers are classified on this value.
    pub normalized_score: f64,
    pub wins: u32,
    pub total_comparisons: u32,
    pub win_rate: f64,
    /// Mean multiplier over winning comparisons only.
    pub avg_multiplier: f64,
    #[serde(skip)]
    win_multiplier_sum: f64,
}

impl RepositoryScore {
    fn new(repo: &str) -> Self {
        Self {
            repo: repo.to_owned(),
            raw_score: 0.0,
            normalized_score: 0.0,
            wins: 0,
            total_comparisons: 0,
            win_rate: 0.0,
            avg_multiplier: 0.0,
            win_multiplier_sum: 0.0,
        }
    }

    pub fn normalized_display(&self) -> f64 {
        round2(self.normalized_score)
    }
}

/// Scores keyed by repository, in first-encounter order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreTable {
    scores: Vec<RepositoryScore>,
    index_by_repo: HashMap<String, usize>,
    max_raw_score: f64,
}

impl ScoreTable {
    pub fn get(&self, repo: &str) -> Option<&RepositoryScore> {
        self.index_by_repo
            .get(repo)
            .and_then(|&index| self.scores.get(index))
    }

    pub fn scores(&self) -> &[RepositoryScore] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Denominator used for normalization; never below 1.
    pub fn max_raw_score(&self) -> f64 {
        self.max_raw_score
    }

    /// Scores sorted by raw score, highest first. The sort is stable so ties
    /// keep encounter order.
    pub fn ranked(&self) -> Vec<&RepositoryScore> {
        let mut ranked = self.scores.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.raw_score.total_cmp(&a.raw_score));
        ranked
    }

    fn entry(&mut self, repo: &str) -> &mut RepositoryScore {
        let index = match self.index_by_repo.get(repo) {
            Some(&index) => index,
            None => {
                let index = self.scores.len();
                self.scores.push(RepositoryScore::new(repo));
                self.index_by_repo.insert(repo.to_owned(), index);
                index
            }
        };
        &mut self.scores[index]
    }
}

/// Aggregates wins and losses into per-repository criticality scores.
///
/// Every repository named as `repo_a`, `repo_b` or `parent` gets exactly one
/// entry. The parent is context only and earns no points.
pub fn score_records(records: &[ComparisonRecord]) -> ScoreTable {
    let mut table = ScoreTable::default();
    if records.is_empty() {
        warn!("no comparison records to score");
        return table;
    }

    for record in records {
        table.entry(&record.repo_a);
        table.entry(&record.repo_b);
        table.entry(&record.parent);
    }

    for record in records {
        let multiplier = record.weight();

        let winner = table.entry(record.winner());
        winner.wins += 1;
        winner.total_comparisons += 1;
        winner.raw_score += multiplier * WIN_POINTS;
        winner.win_multiplier_sum += multiplier;

        let loser = table.entry(record.loser());
        loser.total_comparisons += 1;
        loser.raw_score += LOSS_POINTS;
    }

    let max_raw_score = table
        .scores
        .iter()
        .map(|score| score.raw_score)
        .fold(1.0_f64, f64::max);
    table.max_raw_score = max_raw_score;

    for score in &mut table.scores {
        score.normalized_score = score.raw_score / max_raw_score * 100.0;
        score.win_rate = if score.total_comparisons == 0 {
            0.0
        } else {
            f64::from(score.wins) / f64::from(score.total_comparisons)
        };
        score.avg_multiplier = if score.wins == 0 {
            0.0
        } else {
            score.win_multiplier_sum / f64::from(score.wins)
        };
    }

    debug!(
        repositories = table.len(),
        max_raw_score, "scored comparison records"
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Choice;

    fn record(id: u64, a: &str, b: &str, choice: Choice, multiplier: f64) -> ComparisonRecord {
        ComparisonRecord::new(id, a, b, a, choice, multiplier)
    }

    #[test]
    fn two_record_scenario() {
        let records = vec![
            record(0, "X", "Y", Choice::A, 2.0),
            record(1, "Y", "X", Choice::B, 3.0),
        ];
        let table = score_records(&records);

        let x = table.get("X").unwrap();
        assert_eq!(x.wins, 2);
        assert_eq!(x.total_comparisons, 2);
        assert_eq!(x.raw_score, 50.0);
        assert_eq!(x.normalized_display(), 100.0);
        assert_eq!(x.win_rate, 1.0);
        assert_eq!(x.avg_multiplier, 2.5);

        let y = table.get("Y").unwrap();
        assert_eq!(y.wins, 0);
        assert_eq!(y.total_comparisons, 2);
        assert_eq!(y.raw_score, 4.0);
        assert_eq!(y.normalized_display(), 8.0);
        assert_eq!(y.avg_multiplier, 0.0);
        assert_eq!(table.max_raw_score(), 50.0);
    }

    #[test]
    fn parent_gets_an_entry_but_no_points() {
        let records = vec![ComparisonRecord::new(0, "a/x", "a/y", "a/p", Choice::A, 1.0)];
        let table = score_records(&records);
        let parent = table.get("a/p").unwrap();
        assert_eq!(parent.raw_score, 0.0);
        assert_eq!(parent.total_comparisons, 0);
        assert_eq!(parent.win_rate, 0.0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn non_finite_multiplier_counts_as_one() {
        let records = vec![record(0, "a/x", "a/y", Choice::A, f64::NAN)];
        let table = score_records(&records);
        assert_eq!(table.get("a/x").unwrap().raw_score, 10.0);
        assert_eq!(table.get("a/x").unwrap().avg_multiplier, 1.0);
    }

    #[test]
    fn ranked_is_stable_on_ties() {
        let records = vec![
            record(0, "a/x", "a/y", Choice::A, 1.0),
            record(1, "a/z", "a/w", Choice::A, 1.0),
        ];
        let table = score_records(&records);
        let order = table
            .ranked()
            .iter()
            .map(|score| score.repo.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["a/x", "a/z", "a/y", "a/w"]);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = score_records(&[]);
        assert!(table.is_empty());
        assert!(table.ranked().is_empty());
    }
}
