// src/rank.rs
use crate::alert::Alert;
use crate::config::FilterConfig;

/// Qualifying alerts first, most recently processed first; then, if enabled,
/// the rest in processing order.
pub fn rank(alerts: Vec<Alert>, config: &FilterConfig) -> Vec<Alert> {
    let (mut qualifying, rest): (Vec<Alert>, Vec<Alert>) =
        alerts.into_iter().partition(|a| a.qualifies);
    qualifying.reverse();
    if config.include_non_qualifying {
        qualifying.extend(rest);
    }
    qualifying
}
