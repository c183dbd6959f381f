// tests/config_file.rs
use district_alerts::config::filter::DEFAULT_FEED_URL;
use district_alerts::FilterConfig;
use std::fs;

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("alerts.toml");
    fs::write(
        &p_toml,
        r#"
target_region_name = "Whangarei District"
include_non_qualifying = true
window_hours = 24.0
request_timeout_secs = 5
"#,
    )
    .unwrap();
    let t = FilterConfig::load_from(&p_toml).unwrap();
    assert_eq!(t.target_region_name, "Whangarei District");
    assert!(t.include_non_qualifying);
    assert_eq!(t.window_hours, 24.0);
    assert_eq!(t.request_timeout_secs, 5);
    assert_eq!(t.feed_url, DEFAULT_FEED_URL);

    let p_json = dir.path().join("alerts.json");
    fs::write(&p_json, r#"{"hourWindow": 72, "requireOnsetWithinWindow": true}"#).unwrap();
    let j = FilterConfig::load_from(&p_json).unwrap();
    assert_eq!(j.window_hours, 72.0);
    assert!(j.require_onset_within_window);
}

#[test]
fn garbage_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("alerts.toml");
    fs::write(&p, "window_hours = [nope").unwrap();
    assert!(FilterConfig::load_from(&p).is_err());
    assert!(FilterConfig::load_from(&dir.path().join("missing.toml")).is_err());
}

#[test]
fn nan_window_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("alerts.toml");
    fs::write(&p, "window_hours = nan").unwrap();
    assert_eq!(FilterConfig::load_from(&p).unwrap().window_hours, 100.0);
}
