// In-memory fetcher and lister used by the snapshot tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::github::{Fetch, ListFiles};

pub struct FakeFetcher {
    pages: HashMap<String, (Duration, Result<String>)>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        FakeFetcher {
            pages: HashMap::new(),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn page(mut self, url: &str, delay_ms: u64, body: impl Into<String>) -> Self {
        self.pages
            .insert(url.to_string(), (Duration::from_millis(delay_ms), Ok(body.into())));
        self
    }

    pub fn failing(mut self, url: &str, delay_ms: u64, reason: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            (Duration::from_millis(delay_ms), Err(Error::transport(url, reason))),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let (delay, result) = match self.pages.get(url) {
            Some((delay, result)) => (*delay, result.clone()),
            None => (Duration::ZERO, Err(Error::transport(url, "HTTP 404 Not Found"))),
        };
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub struct FakeLister(pub Result<Vec<String>>);

impl FakeLister {
    pub fn paths(paths: &[&str]) -> Self {
        FakeLister(Ok(paths.iter().map(|p| p.to_string()).collect()))
    }
}

#[async_trait]
impl ListFiles for FakeLister {
    async fn list_files(&self, _repo: &str, _revision: &str) -> Result<Vec<String>> {
        self.0.clone()
    }
}
