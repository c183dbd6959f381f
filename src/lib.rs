// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod alert;
pub mod api;
pub mod boundary;
pub mod config;
pub mod extract;
pub mod geometry;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod rank;
pub mod relevance;
pub mod store;
pub mod transport;

// ---- Re-exports for stable public API ----
pub use crate::alert::Alert;
pub use crate::api::create_router;
pub use crate::boundary::{BoundaryCache, BoundaryGeometry};
pub use crate::config::FilterConfig;
pub use crate::ingest::{EntrySkipped, FeedError};
pub use crate::pipeline::{AlertPipeline, RunReport};
pub use crate::store::{FileStore, KeyValueStore, MemoryStore};
pub use crate::transport::{Fetcher, HttpFetcher, StaticFetcher};

use std::sync::Arc;

/// Production wiring: HTTP transport (with optional proxy) and a file-backed store.
pub fn build_pipeline(config: FilterConfig) -> AlertPipeline {
    let fetcher: Arc<dyn Fetcher> = Arc::new(
        HttpFetcher::new(config.proxy_url.clone()).with_timeout(config.request_timeout_secs),
    );
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config::state_dir()));
    AlertPipeline::new(config, fetcher, store)
}
