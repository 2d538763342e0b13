use async_trait::async_trait;

use crate::config::CONFIG;
use crate::data_models::CardPage;
use crate::error::FetchError;

use super::CardSource;

/// Talks to our own `/api/cards` route.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(CONFIG.gateway_url.clone())
    }
}

#[async_trait]
impl CardSource for GatewayClient {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<CardPage, FetchError> {
        if query.trim().is_empty() {
            return Err(FetchError::EmptyQuery);
        }

        let url = format!("{}/api/cards", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[("q", query.to_string()), ("page", page.to_string())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::UpstreamHttp { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
