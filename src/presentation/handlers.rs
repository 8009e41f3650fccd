// HTTP request handlers
use crate::application::backend::{Endpoint, FormPart, RelayBody};
use crate::domain::dashboard::{BatchView, ModelInfoView, PredictionView, RetrainView, UploadView};
use crate::domain::validation::ValidationError;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    Json,
    body::Bytes,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::{BytesRejection, JsonRejection},
    },
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const INVALID_FORM: &str = "Invalid form submission";

#[derive(Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
}

#[derive(Deserialize)]
pub struct BatchForm {
    #[serde(default)]
    pub locations: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn relay_predict(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    relay_json(&state, Endpoint::Predict, body).await
}

pub async fn relay_batch(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    relay_json(&state, Endpoint::Batch, body).await
}

pub async fn relay_model_info(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    relay(&state, Endpoint::ModelInfo, RelayBody::Empty).await
}

pub async fn relay_retrain(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    relay(&state, Endpoint::Retrain, RelayBody::Empty).await
}

pub async fn relay_status(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    relay(&state, Endpoint::Status, RelayBody::Empty).await
}

/// Forward an uploaded form to the backend's training endpoint, every part untouched
pub async fn relay_train(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let failed = || ApiError::internal(Endpoint::Train.failure_message());

    let multipart = multipart.map_err(|e| {
        tracing::warn!(error = %e, "Rejected training upload");
        failed()
    })?;
    let parts = read_parts(multipart).await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read training upload");
        failed()
    })?;

    relay(&state, Endpoint::Train, RelayBody::Form(parts)).await
}

pub async fn dashboard_predict(
    State(state): State<Arc<AppState>>,
    form: Result<Json<PredictForm>, JsonRejection>,
) -> Result<Json<PredictionView>, ApiError> {
    let Json(form) = form.map_err(invalid_form)?;
    let view = state
        .dashboard_service
        .predict(&form.latitude, &form.longitude)
        .await?;
    Ok(Json(view))
}

pub async fn dashboard_batch(
    State(state): State<Arc<AppState>>,
    form: Result<Json<BatchForm>, JsonRejection>,
) -> Result<Json<BatchView>, ApiError> {
    let Json(form) = form.map_err(invalid_form)?;
    Ok(Json(state.dashboard_service.batch(&form.locations).await?))
}

pub async fn dashboard_model_info(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ModelInfoView>, ApiError> {
    Ok(Json(state.dashboard_service.model_info().await?))
}

pub async fn dashboard_retrain(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RetrainView>, ApiError> {
    Ok(Json(state.dashboard_service.retrain().await?))
}

/// A request that is not a multipart form carries no file at all.
pub async fn dashboard_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadView>, ApiError> {
    let multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Upload is not a multipart form");
        ApiError::bad_request(ValidationError::MissingFile.to_string())
    })?;
    let parts = read_parts(multipart).await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read training upload");
        ApiError::bad_request("Failed to read uploaded file")
    })?;
    let file = parts.into_iter().find(|p| p.name == "file");

    Ok(Json(state.dashboard_service.upload(file).await?))
}

fn invalid_form(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "Rejected dashboard form");
    ApiError::bad_request(INVALID_FORM)
}

async fn relay_json(
    state: &AppState,
    endpoint: Endpoint,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let failed = || ApiError::internal(endpoint.failure_message());

    let body = body.map_err(|e| {
        tracing::warn!(path = endpoint.path(), error = %e, "Failed to buffer relay request body");
        failed()
    })?;
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(path = endpoint.path(), error = %e, "Unreadable relay request body");
        failed()
    })?;

    relay(state, endpoint, RelayBody::Json(payload)).await
}

async fn relay(
    state: &AppState,
    endpoint: Endpoint,
    body: RelayBody,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.relay_service.relay(endpoint, body).await?))
}

async fn read_parts(mut multipart: Multipart) -> Result<Vec<FormPart>, MultipartError> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        parts.push(FormPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    Ok(parts)
}
