//! Greeting API client backing the `hello` query.
//!
//! The endpoint answers with a JSON object such as
//! `{"code": "en", "hello": "Hello"}`; only the `hello` field is used.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum HelloError {
    #[error("greeting request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("greeting endpoint returned status {0}")]
    Status(StatusCode),

    #[error("greeting response has no `hello` field")]
    MissingField,
}

#[derive(Debug, Deserialize)]
struct HelloResponse {
    hello: Option<String>,
}

/// HTTP client for the greeting endpoint.
pub struct HelloClient {
    client: Client,
    url: String,
}

impl HelloClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, HelloError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch a greeting.
    pub async fn fetch_greeting(&self) -> Result<String, HelloError> {
        debug!(url = %self.url, "Fetching greeting");

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(HelloError::Status(response.status()));
        }

        let body: HelloResponse = response.json().await?;
        body.hello.ok_or(HelloError::MissingField)
    }
}
