// src/relevance.rs
//! Relevance gate: does an alert concern the district, and (optionally) does it
//! start soon enough?

use chrono::{DateTime, Utc};

use crate::alert::Alert;
use crate::boundary::BoundaryGeometry;
use crate::config::FilterConfig;

/// Any warned polygon intersects any boundary polygon. Touching counts.
pub fn intersects_boundary(alert: &Alert, boundary: &BoundaryGeometry) -> bool {
    alert
        .warned_polygons
        .iter()
        .any(|p| boundary.intersects(p))
}

/// `0 <= onset - now <= window_hours`. No onset, no window.
pub fn within_window(onset: Option<DateTime<Utc>>, now: DateTime<Utc>, window_hours: f64) -> bool {
    let Some(onset) = onset else {
        return false;
    };
    let diff_hours = (onset - now).num_milliseconds() as f64 / 3_600_000.0;
    (0.0..=window_hours).contains(&diff_hours)
}

/// Fill in `qualifies`. Pure; deterministic for a fixed `now`.
pub fn classify(
    mut alert: Alert,
    boundary: &BoundaryGeometry,
    config: &FilterConfig,
    now: DateTime<Utc>,
) -> Alert {
    let in_district = intersects_boundary(&alert, boundary);
    let timely =
        !config.require_onset_within_window || within_window(alert.onset, now, config.window_hours);
    alert.qualifies = in_district && timely;
    alert
}
