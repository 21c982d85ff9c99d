//! Error types for PDS Registry operations.

use thiserror::Error;

/// Errors that can occur during PDS Registry operations.
#[derive(Debug, Error)]
pub enum PdsError {
    /// Configuration is missing or incomplete.
    #[error("PDS configuration required: {0}")]
    ConfigMissing(String),

    /// Configuration is present but unusable.
    #[error("Invalid PDS configuration: {0}")]
    ConfigInvalid(String),

    /// Invalid PDS identifier.
    #[error("Invalid identifier '{0}': expected a URN like 'urn:nasa:pds:bundle:collection::1.0'")]
    InvalidIdentifier(String),

    /// Search parameters that cannot be turned into a request.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// API request failed.
    #[error("PDS API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// MCP transport failure while serving.
    #[error("MCP transport error: {0}")]
    Transport(String),
}

impl PdsError {
    /// HTTP status code of a failed API call, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PdsError::ApiError { status_code, .. } => *status_code,
            PdsError::NotFound { .. } => Some(404),
            PdsError::RateLimited { .. } => Some(429),
            PdsError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Turn a 404 API error into [`PdsError::NotFound`] for the given entity.
    pub(crate) fn or_not_found(self, entity_type: &'static str, id: &str) -> Self {
        match self {
            PdsError::ApiError {
                status_code: Some(404),
                ..
            } => PdsError::NotFound {
                entity_type,
                id: id.to_string(),
            },
            other => other,
        }
    }
}

/// Result type alias for PDS operations.
pub type Result<T> = core::result::Result<T, PdsError>;
