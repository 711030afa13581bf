use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use super::domain::{
    normalize_keywords, NewOffer, NewTask, ObservationInput, Offer, OfferId, OfferPreferences,
    PreferenceKind, Task, TaskId, TaskUpdate,
};
use super::portfolio::{select_offers, summarize, OfferQuery, OfferSnapshot, PortfolioSummary};
use super::repository::{OfferRepository, RepositoryError};
use super::series::{delete_observation, upsert_observation};
use super::tasks;

/// Service composing offer storage with the scoring and series rules.
pub struct OfferService<R> {
    repository: Arc<R>,
}

static OFFER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static TASK_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_offer_id() -> OfferId {
    let id = OFFER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    OfferId(format!("offer-{id:06}"))
}

fn next_task_id() -> TaskId {
    let id = TASK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TaskId(format!("task-{id:06}"))
}

fn trimmed(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_string())
}

impl<R> OfferService<R>
where
    R: OfferRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Register a new offer with an empty series.
    pub fn create(&self, new_offer: NewOffer) -> Result<Offer, OfferServiceError> {
        let name = new_offer.name.trim();
        if name.is_empty() {
            return Err(OfferServiceError::BlankName);
        }

        let now = Utc::now();
        let offer = Offer {
            id: next_offer_id(),
            name: name.to_string(),
            description: new_offer.description.trim().to_string(),
            keywords: normalize_keywords(new_offer.keywords),
            page_id: new_offer.page_id,
            page_name: new_offer.page_name,
            total_page_ads: None,
            facebook_ad_library_url: new_offer.facebook_ad_library_url,
            series: Vec::new(),
            preferences: OfferPreferences::default(),
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(offer)?;
        info!(offer_id = %stored.id, name = %stored.name, "offer created");
        Ok(stored)
    }

    /// Record (or correct) the active-ad count for one day.
    pub fn record_observation(
        &self,
        offer_id: &OfferId,
        input: ObservationInput,
    ) -> Result<OfferSnapshot, OfferServiceError> {
        let date = input.date;
        let active_ads = input.active_ads;
        let offer = self.modify(offer_id, |offer| {
            let series = std::mem::take(&mut offer.series);
            offer.series = upsert_observation(series, input);
        })?;

        debug!(%offer_id, %date, active_ads, "observation recorded");
        Ok(OfferSnapshot::from_offer(offer))
    }

    pub fn remove_observation(
        &self,
        offer_id: &OfferId,
        date: NaiveDate,
    ) -> Result<OfferSnapshot, OfferServiceError> {
        let offer = self.modify(offer_id, |offer| {
            let series = std::mem::take(&mut offer.series);
            offer.series = delete_observation(series, date);
        })?;

        debug!(%offer_id, %date, "observation removed");
        Ok(OfferSnapshot::from_offer(offer))
    }

    pub fn set_preference(
        &self,
        offer_id: &OfferId,
        kind: PreferenceKind,
        value: bool,
    ) -> Result<Offer, OfferServiceError> {
        let offer = self.modify(offer_id, |offer| offer.preferences.set(kind, value))?;
        info!(%offer_id, "offer {}", kind.label(value));
        Ok(offer)
    }

    pub fn update_keywords(
        &self,
        offer_id: &OfferId,
        keywords: Vec<String>,
    ) -> Result<Offer, OfferServiceError> {
        let keywords = normalize_keywords(keywords);
        self.modify(offer_id, |offer| offer.keywords = keywords)
    }

    pub fn update_total_page_ads(
        &self,
        offer_id: &OfferId,
        total_page_ads: u32,
    ) -> Result<Offer, OfferServiceError> {
        self.modify(offer_id, |offer| offer.total_page_ads = Some(total_page_ads))
    }

    pub fn delete(&self, offer_id: &OfferId) -> Result<(), OfferServiceError> {
        self.repository
            .remove(offer_id)?
            .ok_or(RepositoryError::NotFound)?;
        info!(%offer_id, "offer deleted");
        Ok(())
    }

    pub fn get(&self, offer_id: &OfferId) -> Result<Offer, OfferServiceError> {
        let offer = self
            .repository
            .fetch(offer_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(offer)
    }

    pub fn snapshot(&self, offer_id: &OfferId) -> Result<OfferSnapshot, OfferServiceError> {
        self.get(offer_id).map(OfferSnapshot::from_offer)
    }

    /// Offers matching the query, pinned first then newest first.
    pub fn list(&self, query: &OfferQuery) -> Result<Vec<OfferSnapshot>, OfferServiceError> {
        let offers = self.repository.list()?;
        Ok(select_offers(offers, query)
            .into_iter()
            .map(OfferSnapshot::from_offer)
            .collect())
    }

    /// Analytics across every offer matching `search`, archived ones included.
    pub fn summary(&self, search: Option<&str>) -> Result<PortfolioSummary, OfferServiceError> {
        let offers: Vec<Offer> = self
            .repository
            .list()?
            .into_iter()
            .filter(|offer| search.map(|term| offer.matches(term)).unwrap_or(true))
            .collect();
        Ok(summarize(&offers))
    }

    /// Tasks for an offer in display order.
    pub fn tasks(&self, offer_id: &OfferId) -> Result<Vec<Task>, OfferServiceError> {
        Ok(self.get(offer_id)?.tasks)
    }

    pub fn add_task(
        &self,
        offer_id: &OfferId,
        new_task: NewTask,
    ) -> Result<Task, OfferServiceError> {
        let title = new_task.title.trim().to_string();
        if title.is_empty() {
            return Err(OfferServiceError::BlankTaskTitle);
        }
        let description = trimmed(new_task.description);

        let (_, task) = self.modify_with(offer_id, |offer| {
            tasks::add_task(&mut offer.tasks, next_task_id(), title, description, Utc::now())
        })?;

        info!(%offer_id, task_id = %task.id, "task added");
        Ok(task)
    }

    pub fn update_task(
        &self,
        offer_id: &OfferId,
        task_id: &TaskId,
        mut update: TaskUpdate,
    ) -> Result<Task, OfferServiceError> {
        update.title = trimmed(update.title);
        update.description = trimmed(update.description);
        if update.title.as_deref() == Some("") {
            return Err(OfferServiceError::BlankTaskTitle);
        }

        let (_, task) = self.modify_with(offer_id, |offer| {
            tasks::update_task(&mut offer.tasks, task_id, update, Utc::now())
        })?;
        task.ok_or_else(|| OfferServiceError::TaskNotFound(task_id.clone()))
    }

    pub fn delete_task(
        &self,
        offer_id: &OfferId,
        task_id: &TaskId,
    ) -> Result<(), OfferServiceError> {
        let (_, removed) = self.modify_with(offer_id, |offer| {
            tasks::delete_task(&mut offer.tasks, task_id)
        })?;
        removed.ok_or_else(|| OfferServiceError::TaskNotFound(task_id.clone()))?;
        debug!(%offer_id, %task_id, "task deleted");
        Ok(())
    }

    /// Move the listed tasks to the front in the given order.
    pub fn reorder_tasks(
        &self,
        offer_id: &OfferId,
        order: Vec<TaskId>,
    ) -> Result<Vec<Task>, OfferServiceError> {
        let offer = self.modify(offer_id, |offer| {
            tasks::reorder_tasks(&mut offer.tasks, &order)
        })?;
        Ok(offer.tasks)
    }

    fn modify<F>(&self, offer_id: &OfferId, apply: F) -> Result<Offer, OfferServiceError>
    where
        F: FnOnce(&mut Offer),
    {
        self.modify_with(offer_id, apply).map(|(offer, ())| offer)
    }

    /// Edit an offer in a single repository step and bump `updated_at`.
    fn modify_with<T, F>(
        &self,
        offer_id: &OfferId,
        apply: F,
    ) -> Result<(Offer, T), OfferServiceError>
    where
        F: FnOnce(&mut Offer) -> T,
    {
        let mut apply = Some(apply);
        let mut outcome = None;
        let offer = self.repository.modify(offer_id, &mut |offer: &mut Offer| {
            if let Some(apply) = apply.take() {
                outcome = Some(apply(offer));
                offer.updated_at = Utc::now();
            }
        })?;

        let outcome = outcome.ok_or_else(|| {
            RepositoryError::Unavailable(format!("offer {offer_id} was not modified"))
        })?;
        Ok((offer, outcome))
    }
}

/// Error raised by the offer service.
#[derive(Debug, thiserror::Error)]
pub enum OfferServiceError {
    #[error("offer name must not be blank")]
    BlankName,
    #[error("task title must not be blank")]
    BlankTaskTitle,
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
