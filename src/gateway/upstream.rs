use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::IgnoredAny;

use crate::config::CONFIG;
use crate::data_models::{CardPage, SERVER_PAGE_SIZE};
use crate::error::FetchError;

use super::CardSource;

/// Client for the third-party card database.
///
/// `fetch_raw` hands back the body text exactly as received, once it is known
/// to be JSON, so the HTTP gateway can relay it byte for byte.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn from_config() -> Self {
        Self::new(CONFIG.upstream_url.clone(), CONFIG.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_raw(&self, query: &str, page: u32) -> Result<String, FetchError> {
        if query.trim().is_empty() {
            return Err(FetchError::EmptyQuery);
        }

        let url = format!("{}/cards", self.base_url.trim_end_matches('/'));
        let mut request = self
            .http
            .get(&url)
            .query(&[
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("pageSize", SERVER_PAGE_SIZE.to_string()),
            ])
            .header(CONTENT_TYPE, "application/json");

        // Only add API key if it exists
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::error!("upstream card API error: {status} {body}");
            return Err(FetchError::UpstreamHttp { status, body });
        }

        serde_json::from_str::<IgnoredAny>(&body)?;
        Ok(body)
    }
}

#[async_trait]
impl CardSource for UpstreamClient {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<CardPage, FetchError> {
        let raw = self.fetch_raw(query, page).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}
