// src/extract.rs
//! CAP document → [`Alert`].

use chrono::{DateTime, Utc};
use geo::Polygon;
use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::alert::Alert;
use crate::geometry::{self, GeometryError};
use crate::ingest::CapDocument;

/// Decode HTML entities and collapse whitespace.
pub fn clean_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    re_ws.replace_all(&decoded, " ").trim().to_string()
}

/// RFC 3339 onset; anything else is treated as absent.
pub fn parse_onset(raw: &str) -> Option<DateTime<Utc>> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(t) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(target: "extract", onset = t, error = %e, "unparsable onset");
            None
        }
    }
}

/// CAP polygon text: whitespace-separated `lat,lon` pairs.
/// Returned ring is in `(lon, lat)` order.
pub fn parse_polygon(text: &str) -> Result<Polygon<f64>, GeometryError> {
    let mut pts = Vec::new();
    for pair in text.split_whitespace() {
        let (lat, lon) = pair
            .split_once(',')
            .ok_or_else(|| GeometryError::MalformedPair(pair.to_string()))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| GeometryError::MalformedPair(pair.to_string()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| GeometryError::MalformedPair(pair.to_string()))?;
        pts.push((lon, lat));
    }
    geometry::polygon(&pts, &[])
}

pub fn extract(doc: &CapDocument) -> Alert {
    let mut warned_polygons = Vec::new();
    for text in doc.polygon_texts() {
        match parse_polygon(text) {
            Ok(p) => warned_polygons.push(p),
            Err(e) => {
                tracing::debug!(
                    target: "extract",
                    url = doc.source_url(),
                    identifier = doc.identifier().unwrap_or("-"),
                    error = %e,
                    "dropping warned polygon"
                );
                counter!("alerts_polygons_dropped_total").increment(1);
            }
        }
    }

    let web = doc.web().trim();
    Alert {
        headline: clean_text(doc.headline()),
        description: clean_text(doc.description()),
        area_description: clean_text(doc.area_desc()),
        onset: parse_onset(doc.onset()),
        info_url: (!web.is_empty()).then(|| web.to_string()),
        source_url: doc.source_url().to_string(),
        warned_polygons,
        qualifies: false,
    }
}
