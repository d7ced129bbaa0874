//! Shared outbound HTTP client
//!
//! One `reqwest` client, wrapped in retry middleware for transient failures,
//! is built at startup and cloned into every adapter.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;

use crate::config::HttpConfig;

pub type HttpClient = ClientWithMiddleware;

/// User agent for providers that only serve HTML to browsers
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Build the shared client from configuration
pub fn build_client(config: &HttpConfig) -> Result<HttpClient> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Send a request and decode a JSON body; non-2xx is an error.
pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = send(request).await?;
    response
        .json::<T>()
        .await
        .with_context(|| "Malformed provider payload")
}

/// Send a request and return the body as text; non-2xx is an error.
pub async fn fetch_text(request: RequestBuilder) -> Result<String> {
    let response = send(request).await?;
    response
        .text()
        .await
        .with_context(|| "Failed to read provider response body")
}

async fn send(request: RequestBuilder) -> Result<reqwest::Response> {
    let response = request
        .send()
        .await
        .map_err(|e| anyhow!("Request failed: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("Provider responded with HTTP {}", status.as_u16()));
    }
    Ok(response)
}
