// src/config/filter.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "ALERTS_CONFIG_PATH";
pub const ENV_FEED_URL: &str = "ALERTS_FEED_URL";
pub const ENV_BOUNDARY_URL: &str = "ALERTS_BOUNDARY_URL";
pub const ENV_WINDOW_HOURS: &str = "ALERTS_WINDOW_HOURS";
pub const ENV_TARGET_REGION: &str = "ALERTS_TARGET_REGION";
pub const ENV_PROXY_URL: &str = "ALERTS_PROXY_URL";

pub const DEFAULT_WINDOW_HOURS: f64 = 100.0;
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/almokinsgov/NZSHAPE/refs/heads/main/alerts/latest.xml";
pub const DEFAULT_BOUNDARY_URL: &str =
    "https://raw.githubusercontent.com/almokinsgov/NZSHAPE/main/far_north.geojson";
pub const DEFAULT_TARGET_REGION: &str = "Far North District";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

fn default_window_hours() -> f64 {
    DEFAULT_WINDOW_HOURS
}
fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}
fn default_boundary_url() -> String {
    DEFAULT_BOUNDARY_URL.to_string()
}
fn default_target_region() -> String {
    DEFAULT_TARGET_REGION.to_string()
}
fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Per-invocation filter settings. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_target_region", alias = "farNorthName", alias = "targetRegionName")]
    pub target_region_name: String,
    /// Keep alerts outside the district, listed after the district's own.
    #[serde(default, alias = "showNonFarNorthAlerts", alias = "includeNonQualifying")]
    pub include_non_qualifying: bool,
    #[serde(default, alias = "requireOnsetWithinWindow")]
    pub require_onset_within_window: bool,
    #[serde(default = "default_window_hours", alias = "hourWindow", alias = "windowHours")]
    pub window_hours: f64,
    #[serde(default = "default_feed_url", alias = "feedURL")]
    pub feed_url: String,
    #[serde(default = "default_boundary_url", alias = "boundaryURL")]
    pub boundary_url: String,
    /// Prefix prepended to every (percent-encoded) request URL.
    #[serde(default, alias = "proxyURL")]
    pub proxy_url: Option<String>,
    /// Per-request HTTP timeout for feed, CAP and boundary fetches.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            target_region_name: default_target_region(),
            include_non_qualifying: false,
            require_onset_within_window: false,
            window_hours: DEFAULT_WINDOW_HOURS,
            feed_url: default_feed_url(),
            boundary_url: default_boundary_url(),
            proxy_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl FilterConfig {
    /// Load from an explicit path. TOML or JSON, by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading alerts config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = Self::parse(&content, &ext)
            .with_context(|| format!("parsing alerts config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Resolve config:
    /// 1) $ALERTS_CONFIG_PATH
    /// 2) config/alerts.toml
    /// 3) config/alerts.json
    /// 4) built-in defaults
    ///
    /// then apply single-value env overrides.
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else if Path::new("config/alerts.toml").exists() {
            Self::load_from(Path::new("config/alerts.toml"))?
        } else if Path::new("config/alerts.json").exists() {
            Self::load_from(Path::new("config/alerts.json"))?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides().sanitized())
    }

    fn parse(s: &str, hint_ext: &str) -> Result<Self> {
        if hint_ext == "json" {
            return Ok(serde_json::from_str(s)?);
        }
        match toml::from_str(s) {
            Ok(v) => Ok(v),
            Err(toml_err) => serde_json::from_str(s)
                .map_err(|_| anyhow!("unsupported alerts config format: {toml_err}")),
        }
    }

    fn with_env_overrides(mut self) -> Self {
        let env = |k: &str| {
            std::env::var(k)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        if let Some(v) = env(ENV_FEED_URL) {
            self.feed_url = v;
        }
        if let Some(v) = env(ENV_BOUNDARY_URL) {
            self.boundary_url = v;
        }
        if let Some(v) = env(ENV_TARGET_REGION) {
            self.target_region_name = v;
        }
        if let Some(v) = env(ENV_PROXY_URL) {
            self.proxy_url = Some(v);
        }
        if let Some(h) = env(ENV_WINDOW_HOURS).and_then(|v| v.parse::<f64>().ok()) {
            self.window_hours = h;
        }
        self
    }

    fn sanitized(mut self) -> Self {
        if !self.window_hours.is_finite() || self.window_hours < 0.0 {
            tracing::warn!(
                window_hours = self.window_hours,
                "invalid window_hours, using default"
            );
            self.window_hours = DEFAULT_WINDOW_HOURS;
        }
        if self.proxy_url.as_deref().is_some_and(|p| p.trim().is_empty()) {
            self.proxy_url = None;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = DEFAULT_REQUEST_TIMEOUT_SECS;
        }
        self
    }
}
