//! Merge rules for an offer's observation series.
//!
//! A series holds at most one observation per date, sorted ascending. Every mutation
//! re-derives the per-day `trend` values so they always describe the current ordering.

use chrono::NaiveDate;

use super::domain::{Observation, ObservationInput};

/// Insert a new observation or overwrite the one recorded for the same date.
pub fn upsert_observation(
    mut series: Vec<Observation>,
    input: ObservationInput,
) -> Vec<Observation> {
    match series
        .iter_mut()
        .find(|observation| observation.date == input.date)
    {
        Some(existing) => {
            existing.active_ads = input.active_ads;
            existing.observation = input.observation;
            existing.time = input.time;
        }
        None => series.push(input.into()),
    }

    sort_by_date(&mut series);
    recompute_trends(&mut series);
    series
}

/// Drop the observation recorded for `date`, if any, and refresh trends.
pub fn delete_observation(mut series: Vec<Observation>, date: NaiveDate) -> Vec<Observation> {
    series.retain(|observation| observation.date != date);
    sort_by_date(&mut series);
    recompute_trends(&mut series);
    series
}

/// Recompute each element's trend against its predecessor in slice order.
pub fn recompute_trends(series: &mut [Observation]) {
    let mut previous: Option<u32> = None;
    for observation in series.iter_mut() {
        observation.trend =
            previous.and_then(|prev| day_over_day_change(prev, observation.active_ads));
        previous = Some(observation.active_ads);
    }
}

/// Percentage change between two counts; `None` when there is no baseline to divide by.
pub fn day_over_day_change(previous: u32, current: u32) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    let previous = f64::from(previous);
    Some((f64::from(current) - previous) / previous * 100.0)
}

fn sort_by_date(series: &mut [Observation]) {
    series.sort_by_key(|observation| observation.date);
}
