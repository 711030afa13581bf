//! Offer tracking core: daily ad-count series, quality scoring, and trend analysis.

pub mod config;
pub mod error;
pub mod offers;
pub mod telemetry;
