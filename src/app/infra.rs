use chrono::{DateTime, Duration, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use offer_pulse::offers::{
    recompute_trends, Observation, Offer, OfferId, OfferPreferences, OfferRepository,
    RepositoryError,
};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local offer store; last write wins per offer.
#[derive(Default, Clone)]
pub(crate) struct InMemoryOfferRepository {
    offers: Arc<Mutex<BTreeMap<OfferId, Offer>>>,
}

impl InMemoryOfferRepository {
    pub(crate) fn with_offers(offers: Vec<Offer>) -> Self {
        let offers = offers
            .into_iter()
            .map(|offer| (offer.id.clone(), offer))
            .collect();
        Self {
            offers: Arc::new(Mutex::new(offers)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<OfferId, Offer>>, RepositoryError> {
        self.offers
            .lock()
            .map_err(|_| RepositoryError::Unavailable("offer store mutex poisoned".to_string()))
    }
}

impl OfferRepository for InMemoryOfferRepository {
    fn insert(&self, offer: Offer) -> Result<Offer, RepositoryError> {
        let mut guard = self.lock()?;
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
        let mut guard = self.lock()?;
        let offer = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        apply(offer);
        Ok(offer.clone())
    }

    fn fetch(&self, id: &OfferId) -> Result<Option<Offer>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Offer>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.values().cloned().collect())
    }

    fn remove(&self, id: &OfferId) -> Result<Option<Offer>, RepositoryError> {
        let mut guard = self.lock()?;
        Ok(guard.remove(id))
    }
}

struct DemoProfile {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
    days: u32,
    start: f64,
    spread: u32,
    slope: f64,
}

const DEMO_PROFILES: &[DemoProfile] = &[
    DemoProfile {
        id: "demo-1",
        name: "Digital Marketing Course",
        description: "Complete digital marketing course for beginners",
        keywords: &["marketing", "course"],
        days: 30,
        start: 10.0,
        spread: 25,
        slope: 0.5,
    },
    DemoProfile {
        id: "demo-2",
        name: "Personal Finance E-book",
        description: "Guide to organizing household finances",
        keywords: &["finance", "ebook"],
        days: 20,
        start: 18.0,
        spread: 5,
        slope: -0.2,
    },
    DemoProfile {
        id: "demo-3",
        name: "Sales Mentorship",
        description: "Mentoring program to grow sales",
        keywords: &["sales"],
        days: 15,
        start: 5.0,
        spread: 8,
        slope: 0.1,
    },
    DemoProfile {
        id: "demo-4",
        name: "LinkedIn Training",
        description: "Using LinkedIn to generate leads",
        keywords: &["linkedin", "leads"],
        days: 10,
        start: 2.0,
        spread: 15,
        slope: 1.2,
    },
    DemoProfile {
        id: "demo-5",
        name: "Software Subscription",
        description: "Paid traffic management software",
        keywords: &["saas", "traffic"],
        days: 5,
        start: 12.0,
        spread: 9,
        slope: -0.8,
    },
];

/// Deterministic sample offers ending on `today`, for local demos.
pub(crate) fn demo_offers(today: NaiveDate, now: DateTime<Utc>) -> Vec<Offer> {
    DEMO_PROFILES
        .iter()
        .map(|profile| {
            let mut series: Vec<Observation> = (0..profile.days)
                .rev()
                .map(|days_ago| {
                    let day_index = profile.days - days_ago;
                    let baseline = profile.start + profile.slope * f64::from(day_index);
                    let wobble = f64::from((day_index * 7 + 3) % profile.spread)
                        - f64::from(profile.spread) / 2.0;
                    let active_ads = (baseline + wobble).round().max(0.0) as u32;
                    Observation::new(today - Duration::days(i64::from(days_ago)), active_ads)
                })
                .collect();
            recompute_trends(&mut series);

            Offer {
                id: OfferId(profile.id.to_string()),
                name: profile.name.to_string(),
                description: profile.description.to_string(),
                keywords: profile.keywords.iter().map(|k| k.to_string()).collect(),
                page_id: None,
                page_name: None,
                total_page_ads: None,
                facebook_ad_library_url: None,
                series,
                preferences: OfferPreferences::default(),
                tasks: Vec::new(),
                created_at: now - Duration::days(i64::from(profile.days)),
                updated_at: now,
            }
        })
        .collect()
}
