use serde::{Deserialize, Serialize};

use super::super::domain::Observation;
use super::super::series::day_over_day_change;

/// Minimum number of observations before a trend direction is reported.
pub const MIN_OBSERVATIONS_FOR_TREND: usize = 2;

/// Day-over-day changes smaller than this many percent read as stable.
pub const TREND_SIGNIFICANCE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Direction and signed percentage of the latest day-over-day transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendInfo {
    pub direction: TrendDirection,
    pub percentage: f64,
}

impl TrendInfo {
    pub fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            percentage: 0.0,
        }
    }

    /// Signed change for charts; zero when the move is below the noise threshold.
    pub fn signed_change(&self) -> f64 {
        match self.direction {
            TrendDirection::Stable => 0.0,
            TrendDirection::Up | TrendDirection::Down => self.percentage,
        }
    }
}

/// Compare the two most recent observations, re-sorting a copy by date first.
pub fn calculate_trend(series: &[Observation]) -> TrendInfo {
    if series.len() < MIN_OBSERVATIONS_FOR_TREND {
        return TrendInfo::stable();
    }

    let mut counts: Vec<_> = series
        .iter()
        .map(|observation| (observation.date, observation.active_ads))
        .collect();
    counts.sort_by_key(|(date, _)| *date);

    let (_, previous) = counts[counts.len() - 2];
    let (_, latest) = counts[counts.len() - 1];

    let Some(percentage) = day_over_day_change(previous, latest) else {
        return if latest > 0 {
            TrendInfo {
                direction: TrendDirection::Up,
                percentage: 100.0,
            }
        } else {
            TrendInfo::stable()
        };
    };

    let direction = if percentage.abs() < TREND_SIGNIFICANCE_THRESHOLD {
        TrendDirection::Stable
    } else if percentage > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    TrendInfo {
        direction,
        percentage,
    }
}
