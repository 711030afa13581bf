mod rules;
mod trend;

pub use rules::consistency;
pub use trend::{
    calculate_trend, TrendDirection, TrendInfo, MIN_OBSERVATIONS_FOR_TREND,
    TREND_SIGNIFICANCE_THRESHOLD,
};

use super::domain::Observation;
use serde::{Serialize, Serializer};

/// Series shorter than this receive the neutral score instead of a computed one.
pub const MIN_OBSERVATIONS_FOR_SCORE: usize = 3;

const HIGH_SCORE_FLOOR: u8 = 70;
const MEDIUM_SCORE_FLOOR: u8 = 40;
const NEUTRAL_SCORE: u8 = 50;

/// Categorical bucket for a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreResult {
    High,
    Medium,
    Low,
}

impl ScoreResult {
    pub fn from_value(value: u8) -> Self {
        if value >= HIGH_SCORE_FLOOR {
            ScoreResult::High
        } else if value >= MEDIUM_SCORE_FLOOR {
            ScoreResult::Medium
        } else {
            ScoreResult::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreResult::High => "Worth testing",
            ScoreResult::Medium => "Maybe",
            ScoreResult::Low => "Not worth it",
        }
    }
}

/// Composite 0-100 quality rating for an offer's series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub value: u8,
    pub label: &'static str,
    pub result: ScoreResult,
}

impl Score {
    pub fn insufficient_data() -> Self {
        Self {
            value: NEUTRAL_SCORE,
            label: "Insufficient data",
            result: ScoreResult::Medium,
        }
    }

    fn from_value(value: u8) -> Self {
        let result = ScoreResult::from_value(value);
        Self {
            value,
            label: result.label(),
            result,
        }
    }
}

/// Rubric factor contributing to a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    AverageActivity,
    HalfOverHalfTrend,
    Consistency,
    Longevity,
}

/// Discrete contribution to a score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    #[serde(serialize_with = "serialize_points")]
    pub points: f64,
    pub notes: String,
}

/// Full scoring trail: weighted components, raw total, and the measured signals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub score: Score,
    pub components: Vec<ScoreComponent>,
    #[serde(serialize_with = "serialize_points")]
    pub raw_total: f64,
    pub average_active_ads: f64,
    pub trend_delta: f64,
    pub consistency: f64,
    pub days_active: usize,
}

/// Weighted breakdown for a series, or `None` below the minimum observation count.
///
/// Observations are taken in the order given; callers keep the series date-sorted.
pub fn score_breakdown(series: &[Observation]) -> Option<ScoreBreakdown> {
    if series.len() < MIN_OBSERVATIONS_FOR_SCORE {
        return None;
    }

    let counts: Vec<f64> = series
        .iter()
        .map(|observation| f64::from(observation.active_ads))
        .collect();
    let (components, raw_total, signals) = rules::score_counts(&counts);

    let value = raw_total.clamp(0.0, 100.0).round() as u8;

    Some(ScoreBreakdown {
        score: Score::from_value(value),
        components,
        raw_total,
        average_active_ads: signals.average_active_ads,
        trend_delta: signals.trend_delta,
        consistency: signals.consistency,
        days_active: signals.days_active,
    })
}

/// Composite quality score for a series; short series get the neutral score.
pub fn calculate_score(series: &[Observation]) -> Score {
    score_breakdown(series)
        .map(|breakdown| breakdown.score)
        .unwrap_or_else(Score::insufficient_data)
}

fn serialize_points<S>(points: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64((points * 100.0).round() / 100.0)
}
