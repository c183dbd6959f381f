// src/ingest/cap.rs
use quick_xml::de::from_str;
use serde::Deserialize;

use super::{root_namespace, scrub_html_entities_for_xml, EntrySkipped};

pub const CAP_NS: &str = "urn:oasis:names:tc:emergency:cap:1.2";

#[derive(Debug, Clone, Deserialize)]
struct CapAlert {
    #[serde(default)]
    identifier: Option<String>,
    #[serde(rename = "info", default)]
    info: Vec<CapInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CapInfo {
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    onset: Option<String>,
    #[serde(default)]
    web: Option<String>,
    #[serde(rename = "area", default)]
    areas: Vec<CapArea>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CapArea {
    #[serde(rename = "areaDesc", default)]
    area_desc: Option<String>,
    #[serde(rename = "polygon", default)]
    polygons: Vec<String>,
}

/// One CAP 1.2 alert, reduced to its first `info` block.
#[derive(Debug, Clone)]
pub struct CapDocument {
    source_url: String,
    identifier: Option<String>,
    info: CapInfo,
}

impl CapDocument {
    pub fn parse(source_url: &str, xml: &str) -> Result<Self, EntrySkipped> {
        let clean = scrub_html_entities_for_xml(xml);
        let alert: CapAlert = from_str(&clean).map_err(|e| EntrySkipped::Malformed {
            url: source_url.to_string(),
            reason: e.to_string(),
        })?;

        // CAP elements only: an unbound or foreign root has no CAP info block.
        if root_namespace(&clean).as_deref() != Some(CAP_NS) {
            return Err(EntrySkipped::MissingInfo {
                url: source_url.to_string(),
            });
        }

        let info = alert
            .info
            .into_iter()
            .next()
            .ok_or_else(|| EntrySkipped::MissingInfo {
                url: source_url.to_string(),
            })?;

        Ok(Self {
            source_url: source_url.to_string(),
            identifier: alert.identifier,
            info,
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn headline(&self) -> &str {
        self.info.headline.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.info.description.as_deref().unwrap_or_default()
    }

    pub fn onset(&self) -> &str {
        self.info.onset.as_deref().unwrap_or_default()
    }

    pub fn web(&self) -> &str {
        self.info.web.as_deref().unwrap_or_default()
    }

    /// First area description in the info block.
    pub fn area_desc(&self) -> &str {
        self.info
            .areas
            .iter()
            .find_map(|a| a.area_desc.as_deref())
            .unwrap_or_default()
    }

    /// Raw polygon texts across every area, in document order.
    pub fn polygon_texts(&self) -> impl Iterator<Item = &str> {
        self.info
            .areas
            .iter()
            .flat_map(|a| a.polygons.iter().map(String::as_str))
    }
}
