// src/alert.rs
use chrono::{DateTime, Utc};
use geo::Polygon;
use serde::Serialize;

/// One alert as extracted from a CAP document.
/// `qualifies` is only ever set by [`crate::relevance::classify`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub headline: String,
    pub description: String,
    pub area_description: String,
    pub onset: Option<DateTime<Utc>>,
    pub info_url: Option<String>,
    /// Linked CAP document this alert came from.
    pub source_url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warned_polygons: Vec<Polygon<f64>>,
    pub qualifies: bool,
}

impl Alert {
    /// "<headline> issued for <area>"
    pub fn title(&self) -> String {
        if self.area_description.is_empty() {
            self.headline.clone()
        } else {
            format!("{} issued for {}", self.headline, self.area_description)
        }
    }
}
