// src/pipeline.rs
//! One full run: boundary → feed → extract → classify → rank.

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::alert::Alert;
use crate::boundary::{BoundaryCache, BoundaryOrigin};
use crate::config::FilterConfig;
use crate::extract::extract;
use crate::ingest::{fetch_alert_documents, EntrySkipped, FeedError};
use crate::rank::rank;
use crate::relevance::classify;
use crate::store::KeyValueStore;
use crate::transport::Fetcher;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("alerts_feed_entries_total", "Entries seen in the Atom feed.");
        describe_counter!(
            "alerts_entries_skipped_total",
            "Linked CAP documents skipped (fetch/parse/missing info)."
        );
        describe_counter!(
            "alerts_polygons_dropped_total",
            "Warned polygons dropped for unparsable coordinates."
        );
        describe_counter!(
            "alerts_qualifying_total",
            "Alerts intersecting the district boundary."
        );
        describe_counter!("alerts_feed_failures_total", "Feed fetch/parse failures.");
        describe_counter!("boundary_refresh_total", "Boundary cache refresh attempts.");
        describe_counter!(
            "boundary_fallback_total",
            "Refreshes that fell back to the embedded boundary."
        );
        describe_histogram!("alerts_pipeline_ms", "Full pipeline run time in milliseconds.");
    });
}

/// Everything a run produced, before ranking.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub boundary_origin: BoundaryOrigin,
    /// Classified alerts in processing (feed) order.
    pub classified: Vec<Alert>,
    pub skipped: Vec<EntrySkipped>,
    pub without_link: usize,
}

impl RunReport {
    pub fn qualifying(&self) -> usize {
        self.classified.iter().filter(|a| a.qualifies).count()
    }
}

pub struct AlertPipeline {
    fetcher: Arc<dyn Fetcher>,
    boundary: BoundaryCache,
    config: FilterConfig,
}

impl AlertPipeline {
    pub fn new(config: FilterConfig, fetcher: Arc<dyn Fetcher>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            boundary: BoundaryCache::new(store, fetcher.clone()),
            fetcher,
            config,
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Ranked alerts, or the single feed-level failure.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<Vec<Alert>, FeedError> {
        let report = self.run_report(now).await?;
        Ok(rank(report.classified, &self.config))
    }

    pub async fn run_report(&self, now: DateTime<Utc>) -> Result<RunReport, FeedError> {
        ensure_metrics_described();
        let t0 = std::time::Instant::now();
        let cfg = &self.config;

        let resolved = self
            .boundary
            .resolve(&cfg.target_region_name, &cfg.boundary_url, now)
            .await;

        let mut entries = fetch_alert_documents(self.fetcher.clone(), &cfg.feed_url).await?;

        let mut classified = Vec::with_capacity(entries.remaining());
        let mut skipped = Vec::new();
        while let Some(outcome) = entries.next_document().await {
            match outcome {
                Ok(doc) => classified.push(classify(extract(&doc), &resolved.geometry, cfg, now)),
                Err(skip) => skipped.push(skip),
            }
        }

        let report = RunReport {
            boundary_origin: resolved.origin,
            classified,
            skipped,
            without_link: entries.without_link(),
        };

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("alerts_pipeline_ms").record(ms);
        counter!("alerts_qualifying_total").increment(report.qualifying() as u64);

        tracing::info!(
            target: "pipeline",
            region = %resolved.geometry.name,
            classified = report.classified.len(),
            qualifying = report.qualifying(),
            skipped = report.skipped.len(),
            without_link = report.without_link,
            "alerts run finished"
        );
        Ok(report)
    }
}
