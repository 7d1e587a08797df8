//! HTTP client for the facility-listing API.
//!
//! Wraps `reqwest` with status-code mapping, retry on transient failures and
//! the normalization adapter, so callers only ever see canonical
//! [`Facility`] records.

use std::time::Duration;

use carefind_core::{AppConfig, Facility};
use reqwest::{Client, Url};

use crate::error::ClientError;
use crate::normalize::{normalize_facilities, normalize_facility};
use crate::retry::retry_with_backoff;
use crate::types::RawFacility;

/// Client for the facility API (`{base}/facilities`, `{base}/health`).
pub struct FacilityClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl FacilityClient {
    /// Creates a client rooted at `base_url` (for example `https://host/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`FacilityClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Fetches the full facility collection.
    ///
    /// A body that is not a JSON array yields `Ok(vec![])`; rows that cannot
    /// be decoded are skipped.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure after retries.
    /// - [`ClientError::UnexpectedStatus`] / [`ClientError::NotFound`] on non-2xx.
    /// - [`ClientError::Deserialize`] if the body is not JSON at all.
    pub async fn list_facilities(&self) -> Result<Vec<Facility>, ClientError> {
        let url = self.endpoint("facilities")?;
        let body = self.get_json(&url).await?;
        let facilities = normalize_facilities(body);
        tracing::debug!(count = facilities.len(), %url, "fetched facility list");
        Ok(facilities)
    }

    /// Fetches one facility by id.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if the server answers 404.
    /// - [`ClientError::Deserialize`] if the body is not a facility object.
    /// - Otherwise as [`FacilityClient::list_facilities`].
    pub async fn get_facility(&self, id: i64) -> Result<Facility, ClientError> {
        let url = self.endpoint(&format!("facilities/{id}"))?;
        let body = self.get_json(&url).await?;
        let raw: RawFacility =
            serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
                context: format!("GET facilities/{id}"),
                source: e,
            })?;
        Ok(normalize_facility(raw))
    }

    /// Calls the API health endpoint and returns its JSON body.
    ///
    /// # Errors
    ///
    /// As [`FacilityClient::list_facilities`].
    pub async fn health(&self) -> Result<serde_json::Value, ClientError> {
        let url = self.endpoint("health")?;
        self.get_json(&url).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends a GET with retry, maps the status, and parses the body as JSON.
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
            let response = self
                .client
                .get(url.clone())
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ClientError::NotFound {
                    url: url.to_string(),
                });
            }
            if !status.is_success() {
                return Err(ClientError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: url.to_string(),
                source: e,
            })
        })
        .await
    }
}
