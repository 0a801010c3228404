//! reqwest-backed HTTP client adapter.
//!
//! One client per process: fixed origin, fixed timeout, JSON in and out, and
//! a single bearer token shared by every store.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use cropscan_core::api::{ApiClient, ApiError, HttpMethod, classify_response};
use cropscan_core::config::ApiSettings;
use cropscan_core::error::{CropScanError, Result};
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

/// [`ApiClient`] implementation that talks to the CropScan backend.
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    /// Attached to every request while set.
    token: RwLock<Option<String>>,
}

impl HttpApiClient {
    /// Builds the client from validated settings.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        settings.validate()?;
        let base_url = settings.normalized_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| CropScanError::config(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            base_url = %base_url,
            timeout_secs = settings.timeout_secs,
            "HTTP client configured"
        );

        Ok(Self {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> std::result::Result<Value, ApiError> {
        let url = self.url(path);
        let mut request = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        if let Some(token) = self.bearer_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        tracing::debug!(%method, %url, "Sending request");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "No response from backend");
            ApiError::no_response(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "Failed to read response body");
            ApiError::no_response(format!("Failed to read response body: {}", e))
        })?;

        let parsed = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<Value>(&text).ok()
        };

        if status.is_success() {
            tracing::debug!(%method, %url, status = status.as_u16(), "Request succeeded");
            return Ok(match parsed {
                Some(value) => value,
                None if text.trim().is_empty() => Value::Null,
                None => Value::String(text),
            });
        }

        let err = classify_response(status.as_u16(), parsed.as_ref());
        tracing::debug!(
            %method,
            %url,
            status = status.as_u16(),
            kind = %err.kind,
            "Request failed"
        );
        Err(err)
    }

    fn set_bearer_token(&self, token: Option<String>) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = token;
    }

    fn bearer_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
