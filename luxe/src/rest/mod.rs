pub mod endpoints;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{LuxeError, Result};

/// HTTP client wrapper for the storefront REST API.
///
/// `base_url` already includes the `/api` prefix.
#[derive(Debug, Clone)]
pub struct LuxeHttpClient {
    client: Client,
    base_url: String,
}

/// Error body shape of non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl LuxeHttpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client with a per-request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(format!("{}{}", self.base_url, path)).await
    }

    /// GET a JSON resource addressed by path segments.
    ///
    /// Segments are percent-encoded, so caller-supplied keys cannot escape
    /// their position in the path.
    pub async fn get_segments<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        self.fetch(url.into()).await
    }

    async fn fetch<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        tracing::debug!(%url, "GET");
        let resp = self.client.get(&url).send().await?;
        Self::decode(resp).await
    }

    /// `base_url` followed by `segments`, each one percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| LuxeError::Config(format!("not a base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");
        let resp = self.client.post(&url).json(body).send().await?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LuxeError::Http {
                status,
                detail: parse_detail(&body),
            });
        }

        resp.json::<T>().await.map_err(LuxeError::Request)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Extract a human-readable `detail` from an error body.
///
/// Validation errors may carry a structured `detail` (a list of field
/// errors); those are rendered as compact JSON.
fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
