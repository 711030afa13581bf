use super::{ScoreComponent, ScoreFactor};

const AVERAGE_ACTIVITY_WEIGHT: f64 = 2.5;
const AVERAGE_ACTIVITY_CAP: f64 = 50.0;
const TREND_WEIGHT: f64 = 2.0;
const TREND_CAP: f64 = 20.0;
const CONSISTENCY_POINTS: f64 = 15.0;
const LONGEVITY_WEIGHT: f64 = 0.5;
const LONGEVITY_CAP: f64 = 15.0;

/// Intermediate measurements backing a composite score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScoreSignals {
    pub average_active_ads: f64,
    pub trend_delta: f64,
    pub consistency: f64,
    pub days_active: usize,
}

/// Applies the weighted rubric to a date-ordered list of counts.
///
/// Callers must pass at least one value; the floor for short series lives in the engine.
pub(crate) fn score_counts(counts: &[f64]) -> (Vec<ScoreComponent>, f64, ScoreSignals) {
    let average_active_ads = mean(counts);

    // Odd lengths leave the first half one element shorter.
    let mid = counts.len() / 2;
    let (first_half, second_half) = counts.split_at(mid);
    let trend_delta = mean(second_half) - mean(first_half);

    let consistency = consistency(counts);
    let days_active = counts.len();

    let mut components = Vec::with_capacity(4);

    let activity_points = (average_active_ads * AVERAGE_ACTIVITY_WEIGHT).min(AVERAGE_ACTIVITY_CAP);
    components.push(ScoreComponent {
        factor: ScoreFactor::AverageActivity,
        points: activity_points,
        notes: format!("average of {average_active_ads:.1} active ads per day"),
    });

    let trend_points = if trend_delta > 0.0 {
        (trend_delta * TREND_WEIGHT).min(TREND_CAP)
    } else {
        (trend_delta * TREND_WEIGHT).max(-TREND_CAP)
    };
    components.push(ScoreComponent {
        factor: ScoreFactor::HalfOverHalfTrend,
        points: trend_points,
        notes: if trend_delta > 0.0 {
            format!("second half averages {trend_delta:.1} more active ads")
        } else if trend_delta < 0.0 {
            format!("second half averages {:.1} fewer active ads", -trend_delta)
        } else {
            "no change between halves".to_string()
        },
    });

    let consistency_points = CONSISTENCY_POINTS * (1.0 - consistency);
    components.push(ScoreComponent {
        factor: ScoreFactor::Consistency,
        points: consistency_points,
        notes: format!("variability index {consistency:.2}"),
    });

    let longevity_points = (days_active as f64 * LONGEVITY_WEIGHT).min(LONGEVITY_CAP);
    components.push(ScoreComponent {
        factor: ScoreFactor::Longevity,
        points: longevity_points,
        notes: format!(
            "{days_active} day{} observed",
            if days_active == 1 { "" } else { "s" }
        ),
    });

    let raw = components.iter().map(|component| component.points).sum();

    let signals = ScoreSignals {
        average_active_ads,
        trend_delta,
        consistency,
        days_active,
    };

    (components, raw, signals)
}

/// Population standard deviation relative to the mean, capped at 1 (lower is steadier).
///
/// A zero mean is replaced by 1 so an all-zero series reads as perfectly steady.
/// Returns 0 for an empty slice.
pub fn consistency(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mean = mean(values);
    let variance = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>()
        / values.len() as f64;
    let std_dev = variance.sqrt();
    let denominator = if mean == 0.0 { 1.0 } else { mean };

    (std_dev / denominator).min(1.0)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistency_is_zero_for_flat_values() {
        assert_eq!(consistency(&[10.0, 10.0, 10.0]), 0.0);
        assert_eq!(consistency(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(consistency(&[]), 0.0);
    }

    #[test]
    fn consistency_saturates_at_one() {
        let value = consistency(&[0.0, 0.0, 0.0, 100.0]);
        assert_eq!(value, 1.0);
    }

    #[test]
    fn consistency_uses_population_deviation() {
        // mean 15, variance 50
        let value = consistency(&[5.0, 10.0, 15.0, 20.0, 25.0]);
        assert!((value - 50f64.sqrt() / 15.0).abs() < 1e-12);
    }

    #[test]
    fn odd_lengths_put_the_extra_day_in_the_second_half() {
        let (_, _, signals) = score_counts(&[0.0, 10.0, 10.0]);
        // first half [0], second half [10, 10]
        assert_eq!(signals.trend_delta, 10.0);
        assert_eq!(signals.days_active, 3);
    }

    #[test]
    fn trend_points_are_capped_in_both_directions() {
        let (components, _, _) = score_counts(&[0.0, 0.0, 100.0, 100.0]);
        let trend = components
            .iter()
            .find(|component| component.factor == ScoreFactor::HalfOverHalfTrend)
            .expect("trend component present");
        assert_eq!(trend.points, 20.0);

        let (components, _, _) = score_counts(&[100.0, 100.0, 0.0, 0.0]);
        let trend = components
            .iter()
            .find(|component| component.factor == ScoreFactor::HalfOverHalfTrend)
            .expect("trend component present");
        assert_eq!(trend.points, -20.0);
    }
}
