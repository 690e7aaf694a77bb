use criticality_graph::config::{FundingConfig, GraphConfig, LayoutConfig, TierBoundaries};
use criticality_graph::export::{read_score_table, scores_csv};
use criticality_graph::graph::build_graph;
use criticality_graph::layout::{LayoutSession, Phase};
use criticality_graph::records::{Choice, ComparisonRecord};
use criticality_graph::scoring::{Tier, recommended_funding, score_records};
use proptest::prelude::*;

const REPOS: [&str; 6] = ["a/core", "a/cli", "b/lib", "b/node", "c/sdk", "c/docs"];

fn raw_record() -> impl Strategy<Value = (usize, usize, usize, bool, f64)> {
    (0..REPOS.len(), 1..REPOS.len(), 0..REPOS.len(), any::<bool>(), 1.0f64..5.0)
}

fn records_from(raw: Vec<(usize, usize, usize, bool, f64)>) -> Vec<ComparisonRecord> {
    raw.into_iter()
        .enumerate()
        .map(|(id, (a, offset, parent, pick_a, multiplier))| {
            let b = (a + offset) % REPOS.len();
            let choice = if pick_a { Choice::A } else { Choice::B };
            ComparisonRecord::new(id as u64, REPOS[a], REPOS[b], REPOS[parent], choice, multiplier)
        })
        .collect()
}

fn records() -> impl Strategy<Value = Vec<ComparisonRecord>> {
    prop::collection::vec(raw_record(), 1..60).prop_map(records_from)
}

fn edge_keys(records: &[ComparisonRecord], min_edge_count: u32) -> Vec<(String, String, u32)> {
    let config = GraphConfig {
        min_edge_count,
        largest_component_only: false,
    };
    build_graph(records, &config)
        .edges
        .into_iter()
        .map(|edge| (edge.source, edge.target, edge.count))
        .collect()
}

proptest! {
    #[test]
    fn wins_and_comparisons_add_up(records in records()) {
        let table = score_records(&records);
        let wins: u32 = table.scores().iter().map(|score| score.wins).sum();
        let total: u32 = table.scores().iter().map(|score| score.total_comparisons).sum();
        prop_assert_eq!(wins as usize, records.len());
        prop_assert_eq!(total as usize, 2 * records.len());
    }

    #[test]
    fn top_score_normalizes_to_one_hundred(records in records()) {
        let table = score_records(&records);
        let top = table.ranked()[0];
        prop_assert_eq!(top.normalized_display(), 100.0);
        prop_assert!(table
            .scores()
            .iter()
            .all(|score| (0.0..=100.0).contains(&score.normalized_score)));
    }

    #[test]
    fn tiers_are_monotone_in_score(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
        let bounds = TierBoundaries::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        // Tier order runs from Critical to Peripheral.
        prop_assert!(Tier::classify(high, &bounds) <= Tier::classify(low, &bounds));
    }

    #[test]
    fn funding_is_monotone_and_bounded(a in -50.0f64..150.0, b in -50.0f64..150.0) {
        let funding = FundingConfig::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_amount = recommended_funding(low, &funding);
        let high_amount = recommended_funding(high, &funding);
        prop_assert!(low_amount <= high_amount);
        prop_assert!((5_000..=100_000).contains(&low_amount));
        prop_assert!((5_000..=100_000).contains(&high_amount));
    }

    #[test]
    fn edge_aggregation_ignores_record_order(
        (original, shuffled) in records().prop_flat_map(|records| {
            (Just(records.clone()), Just(records).prop_shuffle())
        })
    ) {
        let config = GraphConfig {
            min_edge_count: 1,
            largest_component_only: false,
        };
        prop_assert_eq!(build_graph(&original, &config), build_graph(&shuffled, &config));
    }

    #[test]
    fn raising_min_edge_count_only_removes_edges(records in records(), k in 1u32..5) {
        let loose = edge_keys(&records, k);
        let strict = edge_keys(&records, k + 1);
        prop_assert!(strict.iter().all(|edge| loose.contains(edge)));
        prop_assert!(strict.iter().all(|(_, _, count)| *count > k));
    }

    #[test]
    fn score_table_round_trips_through_csv(records in records()) {
        let table = score_records(&records);
        let rows = read_score_table(&scores_csv(&table)).unwrap();
        prop_assert_eq!(rows.len(), table.len());
        for row in rows {
            let score = table.get(&row.repo).unwrap();
            prop_assert!((row.normalized_score - score.normalized_score).abs() <= 0.005 + 1e-9);
            prop_assert!((row.win_rate - score.win_rate).abs() <= 0.005 + 1e-9);
            prop_assert!((row.avg_multiplier - score.avg_multiplier).abs() <= 0.005 + 1e-9);
            prop_assert_eq!(row.total_comparisons, score.total_comparisons);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn layout_settles_with_finite_positions(records in records()) {
        let graph = build_graph(&records, &GraphConfig { min_edge_count: 1, largest_component_only: false });
        let mut session = LayoutSession::from_graph(&graph, LayoutConfig::default());
        prop_assert_eq!(session.settle(), 300);
        prop_assert_eq!(session.phase(), Phase::Settled { frames: 300 });
        prop_assert!(session.positions().iter().all(|(_, position)| position.is_finite()));
    }
}

#[test]
fn funding_endpoints() {
    let funding = FundingConfig::default();
    assert_eq!(recommended_funding(0.0, &funding), 5_000);
    assert_eq!(recommended_funding(100.0, &funding), 100_000);
    assert_eq!(recommended_funding(50.0, &funding), 52_500);
}

#[test]
fn every_score_lands_in_exactly_one_tier() {
    let bounds = TierBoundaries::default();
    for step in 0..=10_000 {
        let score = f64::from(step) / 100.0;
        let tier = Tier::classify(score, &bounds);
        let expected = match score {
            s if s >= 80.0 => Tier::Critical,
            s if s >= 60.0 => Tier::Important,
            s if s >= 40.0 => Tier::Moderate,
            s if s >= 20.0 => Tier::Supporting,
            _ => Tier::Peripheral,
        };
        assert_eq!(tier, expected, "score {score}");
    }
}
