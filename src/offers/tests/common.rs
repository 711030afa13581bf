use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration as StdDuration;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::offers::domain::{NewOffer, Observation, Offer, OfferId, OfferPreferences};
use crate::offers::repository::{OfferRepository, RepositoryError};
use crate::offers::series::recompute_trends;
use crate::offers::{offer_router, OfferService};

pub(super) fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date") + Duration::days(offset)
}

/// Consecutive days starting 2024-01-01 with trends filled in.
pub(super) fn series(counts: &[u32]) -> Vec<Observation> {
    let mut series: Vec<Observation> = counts
        .iter()
        .enumerate()
        .map(|(idx, count)| Observation::new(day(idx as i64), *count))
        .collect();
    recompute_trends(&mut series);
    series
}

pub(super) fn created_at(days_ago: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
        - Duration::days(days_ago)
}

pub(super) fn offer(id: &str, name: &str, counts: &[u32], days_ago: i64) -> Offer {
    Offer {
        id: OfferId(id.to_string()),
        name: name.to_string(),
        description: String::new(),
        keywords: Vec::new(),
        page_id: None,
        page_name: None,
        total_page_ads: None,
        facebook_ad_library_url: None,
        series: series(counts),
        preferences: OfferPreferences::default(),
        tasks: Vec::new(),
        created_at: created_at(days_ago),
        updated_at: created_at(days_ago),
    }
}

pub(super) fn new_offer(name: &str) -> NewOffer {
    NewOffer {
        name: name.to_string(),
        description: "Evergreen info product".to_string(),
        keywords: vec![" course ".to_string(), "Course".to_string(), String::new()],
        ..NewOffer::default()
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    offers: Arc<Mutex<BTreeMap<OfferId, Offer>>>,
}

impl OfferRepository for MemoryRepository {
    fn insert(&self, offer: Offer) -> Result<Offer, RepositoryError> {
        let mut guard = self.offers.lock().expect("repository mutex poisoned");
        if guard.contains_key(&offer.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(offer.id.clone(), offer.clone());
        Ok(offer)
    }

    fn modify(
        &self,
        id: &OfferId,
        apply: &mut dyn FnMut(&mut Offer),
    ) -> Result<Offer, RepositoryError> {
        let mut guard = self.offers.lock().expect("repository mutex poisoned");
        let offer = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        apply(offer);
        Ok(offer.clone())
    }

    fn fetch(&self, id: &OfferId) -> Result<Option<Offer>, RepositoryError> {
        let guard = self.offers.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Offer>, RepositoryError> {
        let guard = self.offers.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn remove(&self, id: &OfferId) -> Result<Option<Offer>, RepositoryError> {
        let mut guard = self.offers.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id))
    }
}

pub(super) struct UnavailableRepository;

impl OfferRepository for UnavailableRepository {
    fn insert(&self, _offer: Offer) -> Result<Offer, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify(
        &self,
        _id: &OfferId,
        _apply: &mut dyn FnMut(&mut Offer),
    ) -> Result<Offer, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &OfferId) -> Result<Option<Offer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Offer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &OfferId) -> Result<Option<Offer>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store that stalls inside every read and edit to widen race windows.
#[derive(Default, Clone)]
pub(super) struct SlowRepository {
    inner: MemoryRepository,
}

impl OfferRepository for SlowRepository {
    fn insert(&self, offer: Offer) -> Result<Offer, RepositoryError> {
        self.inner.insert(offer)
    }

    fn modify(
        &self,
        id: &OfferId,
        apply: &mut dyn FnMut(&mut Offer),
    ) -> Result<Offer, RepositoryError> {
        self.inner.modify(id, &mut |offer: &mut Offer| {
            thread::sleep(StdDuration::from_millis(2));
            apply(offer);
        })
    }

    fn fetch(&self, id: &OfferId) -> Result<Option<Offer>, RepositoryError> {
        let offer = self.inner.fetch(id);
        thread::sleep(StdDuration::from_millis(2));
        offer
    }

    fn list(&self) -> Result<Vec<Offer>, RepositoryError> {
        self.inner.list()
    }

    fn remove(&self, id: &OfferId) -> Result<Option<Offer>, RepositoryError> {
        self.inner.remove(id)
    }
}

pub(super) fn build_service() -> (Arc<OfferService<MemoryRepository>>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(OfferService::new(repository.clone()));
    (service, repository)
}

pub(super) fn router_with_service(service: Arc<OfferService<MemoryRepository>>) -> axum::Router {
    offer_router(service)
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
