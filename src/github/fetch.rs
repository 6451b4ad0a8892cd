// src/github/fetch.rs
// =============================================================================
// This module downloads blame pages.
//
// Strategy:
// - One reqwest Client is built up front and shared by every fetch
//   (reqwest pools connections inside the Client)
// - The Client lives in an HttpFetcher owned by main; the snapshot builder
//   only borrows it, so it cannot be dropped while fetches are in flight
// - One attempt per URL, no retries
//
// Rust concepts:
// - Traits: `Fetch` lets tests swap in an in-memory fetcher
// - async_trait: async methods on traits that can be used as `&dyn Fetch`
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::{Error, Result};

/// Downloads the text of one URL
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Transport settings for the shared HTTP client
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// GitHub rejects API requests without a User-Agent
    pub user_agent: String,
    /// Per-request timeout. None means wait as long as the server does.
    pub timeout: Option<Duration>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig {
            user_agent: format!("blame-snapshot/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
        }
    }
}

/// reqwest-backed fetcher holding the process's connection pool
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::transport("<client>", e.to_string()))?;

        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(url, describe(&e)))?;

        // Anything outside 2xx is a failed fetch, redirects included
        check_status(url, response.status())?;

        response
            .text()
            .await
            .map_err(|e| Error::transport(url, describe(&e)))
    }
}

fn check_status(url: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::transport(url, format!("HTTP {}", status)))
    }
}

// Give the common reqwest failure modes a readable name
fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
