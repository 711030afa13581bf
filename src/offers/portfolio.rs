use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Offer, OfferId};
use super::scoring::{calculate_score, calculate_trend, Score, ScoreResult, TrendInfo};

/// Listing views offered by the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferView {
    /// Everything that is not archived.
    #[default]
    All,
    Pinned,
    Favorites,
    Archived,
}

impl OfferView {
    pub fn includes(self, offer: &Offer) -> bool {
        let preferences = &offer.preferences;
        match self {
            OfferView::All => !preferences.archived,
            OfferView::Pinned => preferences.pinned,
            OfferView::Favorites => preferences.favorite,
            OfferView::Archived => preferences.archived,
        }
    }
}

/// Search and view filter applied to offer listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub view: OfferView,
}

impl OfferQuery {
    pub fn matches(&self, offer: &Offer) -> bool {
        let search_hit = self
            .search
            .as_deref()
            .map(|term| offer.matches(term))
            .unwrap_or(true);
        search_hit && self.view.includes(offer)
    }
}

/// Filter offers for a listing and order them pinned first, newest first.
pub fn select_offers(offers: Vec<Offer>, query: &OfferQuery) -> Vec<Offer> {
    let mut selected: Vec<Offer> = offers
        .into_iter()
        .filter(|offer| query.matches(offer))
        .collect();
    selected.sort_by(listing_order);
    selected
}

fn listing_order(a: &Offer, b: &Offer) -> Ordering {
    b.preferences
        .pinned
        .cmp(&a.preferences.pinned)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Card-level view of an offer with its derived score and trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSnapshot {
    pub offer: Offer,
    pub score: Score,
    pub trend: TrendInfo,
    pub latest_active_ads: u32,
}

impl OfferSnapshot {
    pub fn from_offer(offer: Offer) -> Self {
        let score = calculate_score(&offer.series);
        let trend = calculate_trend(&offer.series);
        let latest_active_ads = offer.latest_active_ads();
        Self {
            offer,
            score,
            trend,
            latest_active_ads,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ScoreDistribution {
    fn record(&mut self, result: ScoreResult) {
        match result {
            ScoreResult::High => self.high += 1,
            ScoreResult::Medium => self.medium += 1,
            ScoreResult::Low => self.low += 1,
        }
    }
}

/// One row of the activity leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferActivity {
    pub offer_id: OfferId,
    pub name: String,
    pub active_ads: u32,
    pub total_page_ads: u32,
    pub change: f64,
}

/// Active-ad counts recorded on one date, keyed by offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPoint {
    pub date: NaiveDate,
    pub active_ads: BTreeMap<OfferId, u32>,
}

/// Portfolio-wide analytics for the supplied offers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_offers: usize,
    pub total_active_ads: u64,
    pub total_page_ads: u64,
    pub score_distribution: ScoreDistribution,
    pub leaderboard: Vec<OfferActivity>,
    /// Every date observed across the offers, ascending.
    pub history: Vec<ActivityPoint>,
}

pub fn summarize(offers: &[Offer]) -> PortfolioSummary {
    let mut score_distribution = ScoreDistribution::default();
    let mut total_active_ads: u64 = 0;
    let mut total_page_ads: u64 = 0;
    let mut leaderboard = Vec::with_capacity(offers.len());
    let mut history: BTreeMap<NaiveDate, BTreeMap<OfferId, u32>> = BTreeMap::new();

    for offer in offers {
        let latest = offer.latest_active_ads();
        let page_ads = offer.total_page_ads.unwrap_or(0);
        total_active_ads += u64::from(latest);
        total_page_ads += u64::from(page_ads);
        score_distribution.record(calculate_score(&offer.series).result);

        for observation in &offer.series {
            history
                .entry(observation.date)
                .or_default()
                .insert(offer.id.clone(), observation.active_ads);
        }

        leaderboard.push(OfferActivity {
            offer_id: offer.id.clone(),
            name: offer.name.clone(),
            active_ads: latest,
            total_page_ads: page_ads,
            change: calculate_trend(&offer.series).signed_change(),
        });
    }

    leaderboard.sort_by(|a, b| b.active_ads.cmp(&a.active_ads));

    PortfolioSummary {
        total_offers: offers.len(),
        total_active_ads,
        total_page_ads,
        score_distribution,
        leaderboard,
        history: history
            .into_iter()
            .map(|(date, active_ads)| ActivityPoint { date, active_ads })
            .collect(),
    }
}
