use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use super::domain::{
    NewOffer, NewTask, ObservationInput, Offer, OfferId, PreferenceKind, Task, TaskId, TaskUpdate,
};
use super::portfolio::{OfferQuery, OfferSnapshot, PortfolioSummary};
use super::repository::OfferRepository;
use super::service::OfferService;
use crate::error::AppError;

/// Router builder exposing HTTP endpoints for offers, their series, and their tasks.
pub fn offer_router<R>(service: Arc<OfferService<R>>) -> Router
where
    R: OfferRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/offers",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/v1/offers/summary", get(summary_handler::<R>))
        .route(
            "/api/v1/offers/:offer_id",
            get(snapshot_handler::<R>).delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/offers/:offer_id/observations",
            put(record_observation_handler::<R>),
        )
        .route(
            "/api/v1/offers/:offer_id/observations/:date",
            axum::routing::delete(remove_observation_handler::<R>),
        )
        .route(
            "/api/v1/offers/:offer_id/preferences",
            put(preference_handler::<R>),
        )
        .route(
            "/api/v1/offers/:offer_id/keywords",
            put(keywords_handler::<R>),
        )
        .route(
            "/api/v1/offers/:offer_id/page-ads",
            put(page_ads_handler::<R>),
        )
        .route(
            "/api/v1/offers/:offer_id/tasks",
            get(list_tasks_handler::<R>).post(add_task_handler::<R>),
        )
        .route(
            "/api/v1/offers/:offer_id/tasks/order",
            put(reorder_tasks_handler::<R>),
        )
        .route(
            "/api/v1/offers/:offer_id/tasks/:task_id",
            put(update_task_handler::<R>).delete(delete_task_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryParams {
    #[serde(default)]
    pub(crate) search: Option<String>,
}

/// Observation payload; the date falls back to today (UTC) when omitted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ObservationRequest {
    #[serde(default)]
    pub(crate) date: Option<NaiveDate>,
    pub(crate) active_ads: u32,
    #[serde(default)]
    pub(crate) observation: Option<String>,
    #[serde(default, with = "crate::offers::domain::hhmm")]
    pub(crate) time: Option<NaiveTime>,
}

impl ObservationRequest {
    fn into_input(self, today: NaiveDate) -> ObservationInput {
        ObservationInput {
            date: self.date.unwrap_or(today),
            active_ads: self.active_ads,
            observation: self.observation,
            time: self.time,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreferenceUpdate {
    pub(crate) kind: PreferenceKind,
    pub(crate) value: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KeywordsUpdate {
    pub(crate) keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageAdsUpdate {
    pub(crate) total_page_ads: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskOrder {
    pub(crate) task_ids: Vec<TaskId>,
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Json(new_offer): Json<NewOffer>,
) -> Result<(StatusCode, Json<Offer>), AppError>
where
    R: OfferRepository + 'static,
{
    let offer = service.create(new_offer)?;
    Ok((StatusCode::CREATED, Json(offer)))
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Query(query): Query<OfferQuery>,
) -> Result<Json<Vec<OfferSnapshot>>, AppError>
where
    R: OfferRepository + 'static,
{
    Ok(Json(service.list(&query)?))
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<PortfolioSummary>, AppError>
where
    R: OfferRepository + 'static,
{
    Ok(Json(service.summary(params.search.as_deref())?))
}

pub(crate) async fn snapshot_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(offer_id): Path<String>,
) -> Result<Json<OfferSnapshot>, AppError>
where
    R: OfferRepository + 'static,
{
    Ok(Json(service.snapshot(&OfferId(offer_id))?))
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(offer_id): Path<String>,
) -> Result<StatusCode, AppError>
where
    R: OfferRepository + 'static,
{
    service.delete(&OfferId(offer_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn record_observation_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(offer_id): Path<String>,
    Json(request): Json<ObservationRequest>,
) -> Result<Json<OfferSnapshot>, AppError>
where
    R: OfferRepository + 'static,
{
    let input = request.into_input(Utc::now().date_naive());
    Ok(Json(service.record_observation(&OfferId(offer_id), input)?))
}

pub(crate) async fn remove_observation_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path((offer_id, raw_date)): Path<(String, String)>,
) -> Result<Json<OfferSnapshot>, AppError>
where
    R: OfferRepository + 'static,
{
    let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d").map_err(|source| {
        AppError::InvalidDate {
            value: raw_date.clone(),
            source,
        }
    })?;

    Ok(Json(service.remove_observation(&OfferId(offer_id), date)?))
}

pub(crate) async fn preference_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(offer_id): Path<String>,
    Json(update): Json<PreferenceUpdate>,
) -> Result<Json<Offer>, AppError>
where
    R: OfferRepository + 'static,
{
    let offer = service.set_preference(&OfferId(offer_id), update.kind, update.value)?;
    Ok(Json(offer))
}

pub(crate) async fn keywords_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(offer_id): Path<String>,
    Json(update): Json<KeywordsUpdate>,
) -> Result<Json<Offer>, AppError>
where
    R: OfferRepository + 'static,
{
    Ok(Json(
        service.update_keywords(&OfferId(offer_id), update.keywords)?,
    ))
}

pub(crate) async fn page_ads_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(offer_id): Path<String>,
    Json(update): Json<PageAdsUpdate>,
) -> Result<Json<Offer>, AppError>
where
    R: OfferRepository + 'static,
{
    Ok(Json(service.update_total_page_ads(
        &OfferId(offer_id),
        update.total_page_ads,
    )?))
}

pub(crate) async fn list_tasks_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(offer_id): Path<String>,
) -> Result<Json<Vec<Task>>, AppError>
where
    R: OfferRepository + 'static,
{
    Ok(Json(service.tasks(&OfferId(offer_id))?))
}

pub(crate) async fn add_task_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(offer_id): Path<String>,
    Json(new_task): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), AppError>
where
    R: OfferRepository + 'static,
{
    let task = service.add_task(&OfferId(offer_id), new_task)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub(crate) async fn update_task_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path((offer_id, task_id)): Path<(String, String)>,
    Json(update): Json<TaskUpdate>,
) -> Result<Json<Task>, AppError>
where
    R: OfferRepository + 'static,
{
    let task = service.update_task(&OfferId(offer_id), &TaskId(task_id), update)?;
    Ok(Json(task))
}

pub(crate) async fn delete_task_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path((offer_id, task_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError>
where
    R: OfferRepository + 'static,
{
    service.delete_task(&OfferId(offer_id), &TaskId(task_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn reorder_tasks_handler<R>(
    State(service): State<Arc<OfferService<R>>>,
    Path(offer_id): Path<String>,
    Json(order): Json<TaskOrder>,
) -> Result<Json<Vec<Task>>, AppError>
where
    R: OfferRepository + 'static,
{
    Ok(Json(
        service.reorder_tasks(&OfferId(offer_id), order.task_ids)?,
    ))
}
