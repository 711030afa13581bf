use super::common::*;
use crate::offers::domain::Observation;
use crate::offers::scoring::{
    calculate_score, calculate_trend, score_breakdown, Score, ScoreFactor, ScoreResult,
    TrendDirection, TrendInfo,
};

fn flat(value: u32, days: usize) -> Vec<Observation> {
    series(&vec![value; days])
}

#[test]
fn short_series_receive_the_neutral_score() {
    let expected = Score {
        value: 50,
        label: "Insufficient data",
        result: ScoreResult::Medium,
    };

    assert_eq!(calculate_score(&[]), expected);
    assert_eq!(calculate_score(&series(&[100])), expected);
    assert_eq!(calculate_score(&series(&[0, 100])), expected);
    assert!(score_breakdown(&series(&[0, 100])).is_none());
}

#[test]
fn flat_series_scores_medium() {
    let score = calculate_score(&series(&[10, 10, 10, 10, 10]));

    // 25 activity + 0 trend + 15 consistency + 2.5 longevity = 42.5
    assert_eq!(score.value, 43);
    assert_eq!(score.result, ScoreResult::Medium);
    assert_eq!(score.label, "Maybe");
}

#[test]
fn rising_series_outscores_flat_series_of_same_length() {
    let flat_score = calculate_score(&series(&[10, 10, 10, 10, 10]));
    let rising_score = calculate_score(&series(&[5, 10, 15, 20, 25]));

    assert_eq!(rising_score.value, 68);
    assert!(rising_score.value > flat_score.value);
}

#[test]
fn thresholds_map_to_result_buckets() {
    // flat series: 2.5 * value + 15 + 0.5 * days
    let cases = [
        (flat(20, 10), 70, ScoreResult::High, "Worth testing"),
        (flat(20, 8), 69, ScoreResult::Medium, "Maybe"),
        (flat(8, 10), 40, ScoreResult::Medium, "Maybe"),
        (flat(8, 8), 39, ScoreResult::Low, "Not worth it"),
    ];

    for (series, value, result, label) in cases {
        let score = calculate_score(&series);
        assert_eq!(score.value, value);
        assert_eq!(score.result, result);
        assert_eq!(score.label, label);
    }
}

#[test]
fn score_stays_within_bounds() {
    let collapsing = series(&[500, 400, 300, 0, 0, 0]);
    let saturated = series(&[1000; 60]);
    let silent = series(&[0, 0, 0]);

    for candidate in [&collapsing, &saturated, &silent] {
        let score = calculate_score(candidate);
        assert!(score.value <= 100);
    }

    assert_eq!(calculate_score(&saturated).value, 80);
    // no activity, no variance: consistency and longevity points only
    assert_eq!(calculate_score(&silent).value, 17);
}

#[test]
fn negative_raw_totals_clamp_to_zero() {
    // 11.25 activity - 18 trend + 0 consistency + 3 longevity
    let breakdown = score_breakdown(&series(&[9, 9, 9, 0, 0, 0])).expect("enough data");

    assert!((breakdown.raw_total + 3.75).abs() < 1e-9);
    assert_eq!(breakdown.consistency, 1.0);
    assert_eq!(breakdown.score.value, 0);
    assert_eq!(breakdown.score.result, ScoreResult::Low);
}

#[test]
fn scoring_is_deterministic() {
    let input = series(&[3, 9, 4, 12, 7, 0, 15]);
    let first = (calculate_score(&input), calculate_trend(&input));
    for _ in 0..10 {
        assert_eq!((calculate_score(&input), calculate_trend(&input)), first);
    }
}

#[test]
fn breakdown_components_sum_to_raw_total() {
    let breakdown = score_breakdown(&series(&[5, 10, 15, 20, 25])).expect("enough data");

    let factors: Vec<ScoreFactor> = breakdown
        .components
        .iter()
        .map(|component| component.factor)
        .collect();
    assert_eq!(
        factors,
        vec![
            ScoreFactor::AverageActivity,
            ScoreFactor::HalfOverHalfTrend,
            ScoreFactor::Consistency,
            ScoreFactor::Longevity,
        ]
    );

    let sum: f64 = breakdown.components.iter().map(|c| c.points).sum();
    assert!((sum - breakdown.raw_total).abs() < 1e-9);
    assert_eq!(breakdown.average_active_ads, 15.0);
    assert_eq!(breakdown.days_active, 5);
}

#[test]
fn trend_is_stable_for_short_series() {
    assert_eq!(calculate_trend(&[]), TrendInfo::stable());
    assert_eq!(calculate_trend(&series(&[42])), TrendInfo::stable());
}

#[test]
fn trend_guards_zero_previous_count() {
    assert_eq!(
        calculate_trend(&series(&[0, 5])),
        TrendInfo {
            direction: TrendDirection::Up,
            percentage: 100.0,
        }
    );
    assert_eq!(
        calculate_trend(&series(&[0, 0])),
        TrendInfo {
            direction: TrendDirection::Stable,
            percentage: 0.0,
        }
    );
}

#[test]
fn trend_ignores_moves_below_five_percent() {
    let small = calculate_trend(&series(&[1000, 1049]));
    assert_eq!(small.direction, TrendDirection::Stable);
    assert!((small.percentage - 4.9).abs() < 1e-9);

    let up = calculate_trend(&series(&[1000, 1051]));
    assert_eq!(up.direction, TrendDirection::Up);

    let down = calculate_trend(&series(&[1000, 949]));
    assert_eq!(down.direction, TrendDirection::Down);
    assert!((down.percentage + 5.1).abs() < 1e-9);
}

#[test]
fn trend_sorts_by_date_before_comparing() {
    let mut shuffled = series(&[10, 20, 40]);
    shuffled.swap(0, 2);

    let trend = calculate_trend(&shuffled);
    assert_eq!(trend.direction, TrendDirection::Up);
    assert_eq!(trend.percentage, 100.0);
}
