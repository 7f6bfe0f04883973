//! HTTP client for the inventory offer API.
//!
//! Two calls are made per cycle: the static credential is exchanged for a
//! short-lived token at `POST {base}/token`, then the offers are posted to
//! `POST {base}/offers/import` with that token as bearer.

pub mod submit;
pub mod token;

use std::time::Duration;

use async_trait::async_trait;

use crate::inventory::error::{Result, SyncError};
use crate::inventory::model::{AccessToken, OfferPayload, SubmissionReport};
use crate::inventory::sync::{OfferSink, TokenSource};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SyncError::Http)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TokenSource for ApiClient {
    async fn acquire_token(&self, credential: &str) -> Result<AccessToken> {
        token::acquire_token(self, credential).await
    }
}

#[async_trait]
impl OfferSink for ApiClient {
    async fn submit(&self, payload: &OfferPayload, token: &AccessToken) -> Result<SubmissionReport> {
        submit::submit_offers(self, payload, token).await
    }
}
