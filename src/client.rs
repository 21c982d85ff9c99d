//! PDS Registry API client.
//!
//! Low-level HTTP client that handles base URL resolution and raw requests.
//! Higher-level operations are implemented via traits on entity types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use crate::error::{PdsError, Result};

/// Public PDS Registry search API.
pub const DEFAULT_API_URL: &str = "https://pds.mcp.nasa.gov/api/search/1/";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const USER_AGENT: &str = concat!("pdsapi/", env!("CARGO_PKG_VERSION"));

/// Low-level PDS Registry API client.
///
/// Handles URL construction and HTTP requests. Entity-specific operations
/// are implemented via the `Get` and `Search` traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use pdsapi::PdsClient;
///
/// # fn example() -> pdsapi::Result<()> {
/// // Create from environment variables
/// let client = PdsClient::from_env()?;
///
/// // Or point at a specific registry
/// let client = PdsClient::new("https://pds.mcp.nasa.gov/api/search/1")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PdsClient {
    http: Client,
    base_url: Arc<Url>,
}

impl std::fmt::Debug for PdsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdsClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PdsClient {
    /// Create a client from environment variables.
    ///
    /// Uses `PDS_API_URL` for the base URL (defaults to the public registry)
    /// and optionally `PDS_TIMEOUT_SECS` for the request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `PDS_TIMEOUT_SECS` is not a whole number of seconds
    /// or the base URL is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_url(None)
    }

    /// Like [`PdsClient::from_env`], but an explicit base URL takes the place
    /// of `PDS_API_URL`. `PDS_TIMEOUT_SECS` is still honored.
    ///
    /// # Errors
    ///
    /// Same as [`PdsClient::from_env`].
    pub fn from_env_with_url(base_url: Option<&str>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url.to_string(),
            None => env::var("PDS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        };

        let timeout = match env::var("PDS_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                PdsError::ConfigInvalid(format!(
                    "PDS_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self::with_timeout(&base_url, Duration::from_secs(timeout))
    }

    /// Create a new client for the given base URL with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(PdsError::ConfigMissing("PDS API base URL is empty".to_string()));
        }

        // Ensure base URL ends with / so relative joins keep the API prefix
        let base_url_str = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(timeout)
            .build()
            .map_err(PdsError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(PdsError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .query(query)
            .send()
            .await
            .map_err(PdsError::HttpError)?;

        tracing::debug!(status = %response.status(), url = %response.url(), "registry response");

        Self::check_response(response).await
    }

    /// GET a path and decode the JSON body.
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get(path).await?;
        response.json().await.map_err(PdsError::HttpError)
    }

    /// GET a path with query parameters and decode the JSON body.
    pub async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.get_with_query(path, query).await?;
        response.json().await.map_err(PdsError::HttpError)
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(PdsError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        tracing::warn!(status = status.as_u16(), %message, "registry request failed");
        Err(PdsError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        // The registry answers errors as {"request": ..., "message": ...}
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.trim().is_empty() {
            return format!("HTTP {status}");
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = PdsClient::new("https://pds.mcp.nasa.gov/api/search/1").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("PdsClient"));
        assert!(debug.contains("base_url"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = PdsClient::new("https://pds.mcp.nasa.gov/api/search/1").unwrap();
        let client2 = PdsClient::new("https://pds.mcp.nasa.gov/api/search/1/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_join_keeps_api_prefix() {
        let client = PdsClient::new(DEFAULT_API_URL).unwrap();
        let url = client.base_url().join("classes/collection").unwrap();
        assert_eq!(
            url.as_str(),
            "https://pds.mcp.nasa.gov/api/search/1/classes/collection"
        );
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = PdsClient::new("  ").unwrap_err();
        assert!(matches!(err, PdsError::ConfigMissing(_)));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = PdsClient::new("not a url").unwrap_err();
        assert!(matches!(err, PdsError::UrlError(_)));
    }
}
