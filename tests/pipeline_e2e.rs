// tests/pipeline_e2e.rs
mod common;

use std::sync::Arc;

use common::*;
use district_alerts::boundary::BoundaryOrigin;
use district_alerts::{AlertPipeline, EntrySkipped, FeedError, FilterConfig, MemoryStore, StaticFetcher};

fn pipeline(cfg: FilterConfig, fetcher: StaticFetcher) -> AlertPipeline {
    AlertPipeline::new(cfg, Arc::new(fetcher), Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn malformed_entry_is_skipped_not_fatal() {
    let p = pipeline(config(), full_fetcher());
    let report = p.run_report(now()).await.expect("feed ok");

    assert_eq!(report.classified.len(), 4);
    assert_eq!(report.skipped.len(), 1);
    assert!(matches!(
        &report.skipped[0],
        EntrySkipped::Malformed { url, .. } if url == "https://alerts.test/cap/3.xml"
    ));
    assert_eq!(report.boundary_origin, BoundaryOrigin::Fetched);
    assert_eq!(
        headlines(&report.classified),
        ["Heavy Rain Watch", "Strong Wind Warning", "Thunderstorm Watch", "Heavy Snow Watch"]
    );
}

#[tokio::test]
async fn district_alerts_ranked_last_in_first_out() {
    let p = pipeline(config(), full_fetcher());
    let ranked = p.run(now()).await.unwrap();
    assert_eq!(headlines(&ranked), ["Thunderstorm Watch", "Heavy Rain Watch"]);
    assert!(ranked.iter().all(|a| a.qualifies));
}

#[tokio::test]
async fn non_qualifying_follow_in_feed_order_when_enabled() {
    let cfg = FilterConfig {
        include_non_qualifying: true,
        ..config()
    };
    let ranked = pipeline(cfg, full_fetcher()).run(now()).await.unwrap();
    assert_eq!(
        headlines(&ranked),
        ["Thunderstorm Watch", "Heavy Rain Watch", "Strong Wind Warning", "Heavy Snow Watch"]
    );
    assert_eq!(
        ranked.iter().map(|a| a.qualifies).collect::<Vec<_>>(),
        [true, true, false, false]
    );
}

#[tokio::test]
async fn onset_window_drops_late_and_undated_alerts() {
    let cfg = FilterConfig {
        require_onset_within_window: true,
        window_hours: 100.0,
        ..config()
    };
    // Heavy Rain starts in 12h; Thunderstorm in 150h.
    let ranked = pipeline(cfg, full_fetcher()).run(now()).await.unwrap();
    assert_eq!(headlines(&ranked), ["Heavy Rain Watch"]);
}

#[tokio::test]
async fn unreachable_feed_is_the_single_failure() {
    let fetcher = StaticFetcher::new().with(BOUNDARY_URL, BOUNDARY_GEOJSON);
    let err = pipeline(config(), fetcher).run(now()).await.unwrap_err();
    assert!(matches!(err, FeedError::Fetch(_)));
    assert!(err.to_string().starts_with("feed unavailable"));
}

#[tokio::test]
async fn unparsable_feed_is_the_single_failure() {
    let fetcher = full_fetcher().with(FEED_URL, "<feed><entry></feed>");
    let err = pipeline(config(), fetcher).run(now()).await.unwrap_err();
    assert!(matches!(err, FeedError::Parse(_)));
}

#[tokio::test]
async fn empty_feed_means_no_alerts() {
    let fetcher = full_fetcher().with(FEED_URL, r#"<feed xmlns="http://www.w3.org/2005/Atom"/>"#);
    let ranked = pipeline(config(), fetcher).run(now()).await.unwrap();
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn boundary_outage_still_classifies_against_fallback() {
    let fetcher = full_fetcher().with(BOUNDARY_URL, "503 Service Unavailable");
    let p = pipeline(config(), fetcher);
    let report = p.run_report(now()).await.unwrap();

    assert!(matches!(report.boundary_origin, BoundaryOrigin::Fallback(_)));
    assert_eq!(report.classified.len(), 4);
    // The embedded fallback ring is tiny; none of the fixture polygons reach it.
    assert_eq!(report.qualifying(), 0);
}

#[tokio::test]
async fn documents_are_fetched_sequentially_in_feed_order() {
    let fetcher = Arc::new(full_fetcher());
    let p = AlertPipeline::new(config(), fetcher.clone(), Arc::new(MemoryStore::new()));
    p.run(now()).await.unwrap();
    assert_eq!(
        fetcher.calls(),
        [
            BOUNDARY_URL,
            FEED_URL,
            "https://alerts.test/cap/1.xml",
            "https://alerts.test/cap/2.xml",
            "https://alerts.test/cap/3.xml",
            "https://alerts.test/cap/4.xml",
            "https://alerts.test/cap/5.xml",
        ]
    );
}
