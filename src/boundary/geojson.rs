// src/boundary/geojson.rs
//! GeoJSON shapes for the district boundary document, and conversion to/from
//! [`BoundaryGeometry`].

use geo::Polygon;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{BoundaryGeometry, BoundaryUnavailable};
use crate::geometry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub geometry: Option<Value>,
}

type Position = Vec<f64>;
type Ring = Vec<Position>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum Geometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Feature {
    fn name(&self) -> Option<&str> {
        self.properties.get("Name").and_then(Value::as_str)
    }

    /// Polygons of this feature; unsupported geometry types yield nothing.
    fn polygons(&self) -> Result<Vec<Polygon<f64>>, BoundaryUnavailable> {
        let Some(raw) = self.geometry.clone() else {
            return Ok(Vec::new());
        };
        let geom: Geometry = match serde_json::from_value(raw) {
            Ok(g) => g,
            Err(e) => {
                tracing::debug!(target: "boundary", error = %e, "skipping unsupported geometry");
                return Ok(Vec::new());
            }
        };
        let rings_list = match geom {
            Geometry::Polygon(rings) => vec![rings],
            Geometry::MultiPolygon(polys) => polys,
        };
        rings_list.iter().map(|rings| to_polygon(rings)).collect()
    }
}

fn to_polygon(rings: &[Ring]) -> Result<Polygon<f64>, BoundaryUnavailable> {
    let mut converted = Vec::with_capacity(rings.len());
    for r in rings {
        let mut pts = Vec::with_capacity(r.len());
        for pos in r {
            match pos.as_slice() {
                [lon, lat, ..] => pts.push((*lon, *lat)),
                _ => {
                    return Err(BoundaryUnavailable::Invalid(
                        "position with fewer than two coordinates".into(),
                    ))
                }
            }
        }
        converted.push(pts);
    }
    let Some((exterior, holes)) = converted.split_first() else {
        return Err(BoundaryUnavailable::Invalid("polygon without rings".into()));
    };
    geometry::polygon(exterior, holes).map_err(|e| BoundaryUnavailable::Invalid(e.to_string()))
}

fn read_collection(text: &str) -> Result<FeatureCollection, BoundaryUnavailable> {
    let fc: FeatureCollection =
        serde_json::from_str(text).map_err(|e| BoundaryUnavailable::Parse(e.to_string()))?;
    if fc.kind != "FeatureCollection" {
        return Err(BoundaryUnavailable::Parse(format!(
            "expected FeatureCollection, got `{}`",
            fc.kind
        )));
    }
    Ok(fc)
}

fn named<'a>(fc: &'a FeatureCollection, target: &str) -> Vec<&'a Feature> {
    fc.features
        .iter()
        .filter(|f| f.name().is_some_and(|n| n.eq_ignore_ascii_case(target)))
        .collect()
}

fn assemble(name: String, chosen: Vec<&Feature>) -> Result<BoundaryGeometry, BoundaryUnavailable> {
    let mut polygons = Vec::new();
    for f in chosen {
        polygons.extend(f.polygons()?);
    }
    if polygons.is_empty() {
        return Err(BoundaryUnavailable::Empty);
    }
    Ok(BoundaryGeometry { name, polygons })
}

/// Parse a boundary document and keep the features named like `target`.
/// A single-region document whose names don't match is used whole.
pub fn parse_boundary(text: &str, target: &str) -> Result<BoundaryGeometry, BoundaryUnavailable> {
    let fc = read_collection(text)?;
    let matching = named(&fc, target);

    if matching.is_empty() {
        if !fc.features.is_empty() {
            tracing::warn!(
                target: "boundary",
                region = target,
                features = fc.features.len(),
                "no feature named like target region; using all features"
            );
        }
        return assemble(target.to_string(), fc.features.iter().collect());
    }
    let name = matching[0].name().unwrap_or(target).to_string();
    assemble(name, matching)
}

/// Parse a stored boundary. Only features named like `target` count, so a
/// document saved for another region yields `Ok(None)`.
pub fn parse_cached(
    text: &str,
    target: &str,
) -> Result<Option<BoundaryGeometry>, BoundaryUnavailable> {
    let fc = read_collection(text)?;
    let matching = named(&fc, target);
    let Some(first) = matching.first() else {
        return Ok(None);
    };
    let name = first.name().unwrap_or(target).to_string();
    assemble(name, matching).map(Some)
}

/// Serialize as a one-feature `MultiPolygon` collection.
pub fn to_geojson(b: &BoundaryGeometry) -> String {
    let coords: Vec<Value> = b
        .polygons
        .iter()
        .map(|p| {
            let rings: Vec<Value> = std::iter::once(p.exterior())
                .chain(p.interiors().iter())
                .map(|ls| {
                    Value::Array(ls.coords().map(|c| json!([c.x, c.y])).collect::<Vec<_>>())
                })
                .collect();
            Value::Array(rings)
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "Name": b.name },
            "geometry": { "type": "MultiPolygon", "coordinates": coords }
        }]
    })
    .to_string()
}
