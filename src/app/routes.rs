use super::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json};
use chrono::NaiveDate;
use offer_pulse::offers::{
    calculate_score, calculate_trend, delete_observation, offer_router, recompute_trends,
    score_breakdown, upsert_observation, Observation, ObservationInput, OfferRepository,
    OfferService, Score, ScoreBreakdown, TrendInfo,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreRequest {
    pub(crate) series: Vec<Observation>,
    #[serde(default)]
    pub(crate) include_breakdown: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreResponse {
    pub(crate) score: Score,
    pub(crate) trend: TrendInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) breakdown: Option<ScoreBreakdown>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpsertRequest {
    #[serde(default)]
    pub(crate) series: Vec<Observation>,
    pub(crate) observation: ObservationInput,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteRequest {
    #[serde(default)]
    pub(crate) series: Vec<Observation>,
    pub(crate) date: NaiveDate,
}

pub(crate) fn with_offer_routes<R>(service: Arc<OfferService<R>>) -> axum::Router
where
    R: OfferRepository + 'static,
{
    offer_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/score", post(score_endpoint))
        .route("/api/v1/series/upsert", post(upsert_endpoint))
        .route("/api/v1/series/delete", post(delete_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Score an ad-hoc series; it is date-sorted before the halves are taken.
pub(crate) async fn score_endpoint(Json(payload): Json<ScoreRequest>) -> Json<ScoreResponse> {
    let ScoreRequest {
        mut series,
        include_breakdown,
    } = payload;

    series.sort_by_key(|observation| observation.date);
    recompute_trends(&mut series);

    let breakdown = if include_breakdown {
        score_breakdown(&series)
    } else {
        None
    };

    Json(ScoreResponse {
        score: calculate_score(&series),
        trend: calculate_trend(&series),
        breakdown,
    })
}

pub(crate) async fn upsert_endpoint(Json(payload): Json<UpsertRequest>) -> Json<Vec<Observation>> {
    Json(upsert_observation(payload.series, payload.observation))
}

pub(crate) async fn delete_endpoint(Json(payload): Json<DeleteRequest>) -> Json<Vec<Observation>> {
    Json(delete_observation(payload.series, payload.date))
}
