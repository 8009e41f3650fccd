// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_batch, dashboard_model_info, dashboard_predict, dashboard_retrain, dashboard_upload,
    health_check, relay_batch, relay_model_info, relay_predict, relay_retrain, relay_status,
    relay_train,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        // Relays: body in, backend JSON out
        .route("/api/predict", post(relay_predict))
        .route("/api/batch", post(relay_batch))
        .route("/api/model-info", get(relay_model_info))
        .route("/api/retrain", post(relay_retrain))
        .route(
            "/api/train",
            post(relay_train).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/status", get(relay_status))
        // Dashboard views
        .route("/dashboard/predict", post(dashboard_predict))
        .route("/dashboard/batch", post(dashboard_batch))
        .route("/dashboard/model-info", get(dashboard_model_info))
        .route("/dashboard/retrain", post(dashboard_retrain))
        .route(
            "/dashboard/upload",
            post(dashboard_upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
