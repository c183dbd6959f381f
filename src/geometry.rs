// src/geometry.rs
//! Ring construction shared by boundary loading and CAP polygon extraction.
//! Coordinates are `(longitude, latitude)` in decimal degrees.

use geo::{Coord, LineString, Polygon};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("ring has {0} distinct vertices, need at least 3")]
    TooFewVertices(usize),
    #[error("non-finite coordinate")]
    NonFinite,
    #[error("coordinate out of range: lon={lon}, lat={lat}")]
    OutOfRange { lon: f64, lat: f64 },
    #[error("malformed coordinate pair `{0}`")]
    MalformedPair(String),
}

/// Validate a ring and close it if needed.
pub fn ring(points: &[(f64, f64)]) -> Result<LineString<f64>, GeometryError> {
    // Three distinct vertices suffice; stop tracking after that.
    let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(3);
    for &(lon, lat) in points {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(GeometryError::OutOfRange { lon, lat });
        }
        if distinct.len() < 3 && !distinct.contains(&(lon, lat)) {
            distinct.push((lon, lat));
        }
    }
    if distinct.len() < 3 {
        return Err(GeometryError::TooFewVertices(distinct.len()));
    }

    let mut ls: LineString<f64> = points
        .iter()
        .map(|&(x, y)| Coord { x, y })
        .collect::<Vec<_>>()
        .into();
    ls.close();
    Ok(ls)
}

/// Polygon from an exterior ring and optional holes.
pub fn polygon(
    exterior: &[(f64, f64)],
    holes: &[Vec<(f64, f64)>],
) -> Result<Polygon<f64>, GeometryError> {
    let ext = ring(exterior)?;
    let interiors = holes
        .iter()
        .map(|h| ring(h))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(ext, interiors))
}
