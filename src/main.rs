//! District alerts service — binary entrypoint.
//! Boots the Axum HTTP server with the alerts pipeline and the /metrics endpoint.

use std::sync::Arc;

use district_alerts::api::{create_router, AppState};
use district_alerts::metrics::Metrics;
use district_alerts::{build_pipeline, FilterConfig};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - ALERTS_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("ALERTS_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("boundary=info,feed=info,pipeline=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let config = FilterConfig::load_default()?;
    tracing::info!(
        region = %config.target_region_name,
        feed = %config.feed_url,
        "alerts config loaded"
    );

    let metrics = Metrics::init()?;
    let state = AppState {
        pipeline: Arc::new(build_pipeline(config)),
    };
    let router = create_router(state).merge(metrics.router());

    Ok(router.into())
}
