//! Content gateway: authenticated HTTP access to the microCMS REST API
//!
//! Fault tolerance here is "fail soft to empty": a missing environment, a
//! non-2xx status, a network error, or malformed JSON all degrade to an empty
//! page (or `None` for single lookups) with a warning. No retries happen at
//! this layer; response caching is delegated to HTTP-level revalidation
//! upstream, so the client itself is stateless and idempotent.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::cms::model::ContentPage;
use crate::cms::query::{ContentQuery, Filter};
use crate::config::CmsConfig;

const API_KEY_HEADER: &str = "X-MICROCMS-API-KEY";
const DEFAULT_LIMIT: usize = 10;

/// Gateway-level failure, kept internal to the fail-soft surface
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("CMS credentials are not configured")]
    NotConfigured,

    #[error("CMS returned status {0}")]
    Status(u16),

    #[error("CMS request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Stateless CMS client holding only immutable configuration
#[derive(Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    /// `None` means degraded "environment not configured" mode
    base_url: Option<String>,
    api_key: String,
}

impl CmsClient {
    /// Build from configuration. Missing credentials yield a degraded client
    /// whose every call returns empty results.
    pub fn new(config: &CmsConfig) -> Self {
        match (&config.service_domain, &config.api_key) {
            (Some(domain), Some(key)) => Self {
                http: reqwest::Client::new(),
                base_url: Some(format!("https://{}.microcms.io/api/v1", domain)),
                api_key: key.clone(),
            },
            _ => {
                tracing::warn!("CMS credentials are not set; serving empty content");
                Self {
                    http: reqwest::Client::new(),
                    base_url: None,
                    api_key: String::new(),
                }
            }
        }
    }

    /// Build against an explicit base URL (tests)
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Some(base_url.into()),
            api_key: api_key.into(),
        }
    }

    /// Whether live credentials are present
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Fetch one page of entities from a list endpoint. Never errors: any
    /// failure is logged and surfaced as an empty page.
    pub async fn list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &ContentQuery,
    ) -> ContentPage<T> {
        let limit = query.limit_value().unwrap_or(DEFAULT_LIMIT);
        match self.try_list(endpoint, query).await {
            Ok(page) => page,
            Err(CmsError::NotConfigured) => ContentPage::empty(limit),
            Err(err) => {
                tracing::warn!(endpoint, error = %err, "CMS list request failed");
                ContentPage::empty(limit)
            }
        }
    }

    /// Fetch all matching entities in one bounded request (limit 100)
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: ContentQuery,
    ) -> Vec<T> {
        self.list(endpoint, &query.limit(100)).await.items
    }

    /// Single-item lookup by content id. `None` on not-found or any failure.
    pub async fn fetch_by_id<T: DeserializeOwned>(&self, endpoint: &str, id: &str) -> Option<T> {
        let base = self.base_url.as_ref()?;
        let url = format!("{}/{}/{}", base, endpoint, id);

        let response = match self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(endpoint, id, error = %err, "CMS fetch failed");
                return None;
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return None;
        }
        if !status.is_success() {
            tracing::warn!(endpoint, id, status = status.as_u16(), "CMS fetch failed");
            return None;
        }

        match response.json::<T>().await {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(endpoint, id, error = %err, "CMS response decode failed");
                None
            }
        }
    }

    /// First entity matching a filter, or `None`
    pub async fn first_match<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        filter: Filter,
    ) -> Option<T> {
        let query = ContentQuery::new().limit(1).filters(filter);
        self.list(endpoint, &query).await.items.into_iter().next()
    }

    async fn try_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &ContentQuery,
    ) -> Result<ContentPage<T>, CmsError> {
        let base = self.base_url.as_ref().ok_or(CmsError::NotConfigured)?;
        let url = format!("{}/{}", base, endpoint);

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&query.to_params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status(status.as_u16()));
        }

        Ok(response.json::<ContentPage<T>>().await?)
    }
}
