//! Fetch Gateway: where server pages of cards come from.
//!
//! The search state machine only ever talks to a [`CardSource`]. The binary
//! picks one of the implementations below depending on how it is deployed:
//! through our own HTTP gateway, straight to the upstream API, or offline.

use async_trait::async_trait;

use crate::data_models::CardPage;
use crate::error::FetchError;

pub mod client;
pub mod demo;
pub mod upstream;

pub use client::GatewayClient;
pub use demo::DemoCards;
pub use upstream::UpstreamClient;

#[async_trait]
pub trait CardSource: Send + Sync {
    /// Fetch one server page (1-based) for `query`.
    async fn fetch_page(&self, query: &str, page: u32) -> Result<CardPage, FetchError>;
}

