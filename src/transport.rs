// src/transport.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::filter::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Fetch a URL and hand back its body as text.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    proxy_url: Option<String>,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(proxy_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            proxy_url: proxy_url.filter(|p| !p.trim().is_empty()),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// With a proxy configured, the target URL is percent-encoded and appended
    /// to the proxy prefix (e.g. `https://corsproxy.io/?`).
    pub fn request_url(&self, url: &str) -> String {
        match &self.proxy_url {
            Some(p) => format!("{p}{}", urlencoding::encode(url)),
            None => url.to_string(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let target = self.request_url(url);
        let resp = self
            .client
            .get(&target)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        tracing::debug!(target: "transport", %url, %status, "fetched");
        if !status.is_success() {
            return Err(anyhow!("GET {url}: unexpected status {status}"));
        }
        resp.text()
            .await
            .with_context(|| format!("reading body of {url}"))
    }
}

/// Serves canned bodies keyed by URL; unknown URLs fail like an unreachable host.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        if let Ok(mut c) = self.calls.lock() {
            c.push(url.to_string());
        }
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("GET {url}: connection refused"))
    }
}
