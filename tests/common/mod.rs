// tests/common/mod.rs
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use district_alerts::{FilterConfig, StaticFetcher};

pub const FEED_URL: &str = "https://alerts.test/feed.xml";
pub const BOUNDARY_URL: &str = "https://boundary.test/far_north.geojson";

pub const FEED_XML: &str = include_str!("../fixtures/feed.xml");
pub const BOUNDARY_GEOJSON: &str = include_str!("../fixtures/boundary.geojson");
pub const CAP_1: &str = include_str!("../fixtures/cap_1_inside.xml");
pub const CAP_2: &str = include_str!("../fixtures/cap_2_outside.xml");
pub const CAP_3: &str = include_str!("../fixtures/cap_3_malformed.xml");
pub const CAP_4: &str = include_str!("../fixtures/cap_4_touching.xml");
pub const CAP_5: &str = include_str!("../fixtures/cap_5_outside.xml");

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()
}

pub fn config() -> FilterConfig {
    FilterConfig {
        feed_url: FEED_URL.into(),
        boundary_url: BOUNDARY_URL.into(),
        ..FilterConfig::default()
    }
}

/// Feed, all five linked documents and the boundary.
pub fn full_fetcher() -> StaticFetcher {
    StaticFetcher::new()
        .with(FEED_URL, FEED_XML)
        .with(BOUNDARY_URL, BOUNDARY_GEOJSON)
        .with("https://alerts.test/cap/1.xml", CAP_1)
        .with("https://alerts.test/cap/2.xml", CAP_2)
        .with("https://alerts.test/cap/3.xml", CAP_3)
        .with("https://alerts.test/cap/4.xml", CAP_4)
        .with("https://alerts.test/cap/5.xml", CAP_5)
}

pub fn headlines(alerts: &[district_alerts::Alert]) -> Vec<&str> {
    alerts.iter().map(|a| a.headline.as_str()).collect()
}
