use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for tracked offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfferId(pub String);

impl std::fmt::Display for OfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One dated measurement of active ads for an offer.
///
/// `trend` is derived from the previous observation in the sorted series and is left
/// empty when there is no meaningful baseline (first day, or a previous count of zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub date: NaiveDate,
    pub active_ads: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, active_ads: u32) -> Self {
        Self {
            date,
            active_ads,
            observation: None,
            time: None,
            trend: None,
        }
    }
}

/// New or corrected measurement supplied by the caller for a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationInput {
    pub date: NaiveDate,
    pub active_ads: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
}

impl ObservationInput {
    pub fn new(date: NaiveDate, active_ads: u32) -> Self {
        Self {
            date,
            active_ads,
            observation: None,
            time: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.observation = Some(note.into());
        self
    }

    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }
}

impl From<ObservationInput> for Observation {
    fn from(input: ObservationInput) -> Self {
        Self {
            date: input.date,
            active_ads: input.active_ads,
            observation: input.observation,
            time: input.time,
            trend: None,
        }
    }
}

/// Per-user flags controlling how an offer is surfaced in listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferPreferences {
    pub pinned: bool,
    pub favorite: bool,
    pub archived: bool,
}

impl OfferPreferences {
    pub fn set(&mut self, kind: PreferenceKind, value: bool) {
        match kind {
            PreferenceKind::Pin => self.pinned = value,
            PreferenceKind::Favorite => self.favorite = value,
            PreferenceKind::Archive => self.archived = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKind {
    Pin,
    Favorite,
    Archive,
}

impl PreferenceKind {
    pub fn label(self, value: bool) -> &'static str {
        match (self, value) {
            (PreferenceKind::Pin, true) => "pinned",
            (PreferenceKind::Pin, false) => "unpinned",
            (PreferenceKind::Favorite, true) => "added to favorites",
            (PreferenceKind::Favorite, false) => "removed from favorites",
            (PreferenceKind::Archive, true) => "archived",
            (PreferenceKind::Archive, false) => "unarchived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checklist item attached to an offer, shown in `position` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial task edit; absent fields are left alone and an empty description clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Tracked advertising offer with its observation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_page_ads: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook_ad_library_url: Option<String>,
    #[serde(default)]
    pub series: Vec<Observation>,
    #[serde(default)]
    pub preferences: OfferPreferences,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    /// Most recent count in the series, assuming date order.
    pub fn latest_active_ads(&self) -> u32 {
        self.series
            .last()
            .map(|observation| observation.active_ads)
            .unwrap_or(0)
    }

    /// Case-insensitive substring match over name, description, and keywords.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self
                .keywords
                .iter()
                .any(|keyword| keyword.to_lowercase().contains(&term))
    }
}

/// Creation payload for a new offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub page_id: Option<String>,
    #[serde(default)]
    pub page_name: Option<String>,
    #[serde(default)]
    pub facebook_ad_library_url: Option<String>,
}

/// Trim keywords, dropping blanks and repeats while keeping first-seen order.
pub fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            continue;
        }
        if normalized
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(trimmed))
        {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}

/// `HH:MM` encoding for optional times of day.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub(crate) fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<String>::deserialize(deserializer)?;
        opt.map(|raw| {
            NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(|err| {
                serde::de::Error::custom(format!("failed to parse '{raw}' as HH:MM ({err})"))
            })
        })
        .transpose()
    }
}
