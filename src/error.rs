use crate::config::ConfigError;
use crate::offers::{OfferServiceError, RepositoryError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::warn;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Input(serde_json::Error),
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },
    Offers(OfferServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Input(err) => write!(f, "invalid input: {}", err),
            AppError::InvalidDate { value, source } => {
                write!(f, "failed to parse '{}' as YYYY-MM-DD ({})", value, source)
            }
            AppError::Offers(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Input(err) => Some(err),
            AppError::InvalidDate { source, .. } => Some(source),
            AppError::Offers(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Input(_) | AppError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            AppError::Offers(OfferServiceError::BlankName | OfferServiceError::BlankTaskTitle) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Offers(
                OfferServiceError::TaskNotFound(_)
                | OfferServiceError::Repository(RepositoryError::NotFound),
            ) => StatusCode::NOT_FOUND,
            AppError::Offers(OfferServiceError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Offers(OfferServiceError::Repository(RepositoryError::Unavailable(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Input(value)
    }
}

impl From<OfferServiceError> for AppError {
    fn from(value: OfferServiceError) -> Self {
        Self::Offers(value)
    }
}
