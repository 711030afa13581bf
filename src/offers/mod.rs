//! Offer tracking: observation series, scoring, task lists, listings, and the HTTP surface.
//!
//! `scoring`, `series`, and `tasks` are pure functions over offer values and never touch
//! storage; `service` and `router` wire them to an [`OfferRepository`] implementation.

pub mod domain;
pub mod portfolio;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod series;
pub mod service;
pub mod tasks;

#[cfg(test)]
mod tests;

pub use domain::{
    normalize_keywords, NewOffer, NewTask, Observation, ObservationInput, Offer, OfferId,
    OfferPreferences, PreferenceKind, Task, TaskId, TaskUpdate,
};
pub use portfolio::{
    select_offers, summarize, ActivityPoint, OfferActivity, OfferQuery, OfferSnapshot,
    OfferView, PortfolioSummary, ScoreDistribution,
};
pub use repository::{OfferRepository, RepositoryError};
pub use router::offer_router;
pub use scoring::{
    calculate_score, calculate_trend, consistency, score_breakdown, Score, ScoreBreakdown,
    ScoreComponent, ScoreFactor, ScoreResult, TrendDirection, TrendInfo,
    MIN_OBSERVATIONS_FOR_SCORE, MIN_OBSERVATIONS_FOR_TREND, TREND_SIGNIFICANCE_THRESHOLD,
};
pub use series::{day_over_day_change, delete_observation, recompute_trends, upsert_observation};
pub use service::{OfferService, OfferServiceError};
pub use tasks::{add_task, delete_task, reorder_tasks, update_task};
