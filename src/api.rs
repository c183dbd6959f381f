// src/api.rs
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::alert::Alert;
use crate::pipeline::AlertPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AlertPipeline>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/alerts", get(alerts))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum AlertsResp {
    Ok {
        region: String,
        count: usize,
        alerts: Vec<Alert>,
    },
    Failed {
        error: &'static str,
        detail: String,
    },
}

async fn alerts(State(state): State<AppState>) -> (StatusCode, Json<AlertsResp>) {
    let now = chrono::Utc::now();
    match state.pipeline.run(now).await {
        Ok(alerts) => (
            StatusCode::OK,
            Json(AlertsResp::Ok {
                region: state.pipeline.config().target_region_name.clone(),
                count: alerts.len(),
                alerts,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "error loading alerts");
            (
                StatusCode::BAD_GATEWAY,
                Json(AlertsResp::Failed {
                    error: "alerts failed to load",
                    detail: e.to_string(),
                }),
            )
        }
    }
}
