// Backend trait for the external prediction service
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

/// A route on the prediction backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Predict,
    Batch,
    ModelInfo,
    Retrain,
    Train,
    Status,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Predict => "/predict",
            Self::Batch => "/batch",
            Self::ModelInfo => "/model-info",
            Self::Retrain => "/retrain",
            Self::Train => "/train",
            Self::Status => "/",
        }
    }

    pub fn is_get(self) -> bool {
        matches!(self, Self::ModelInfo | Self::Status)
    }

    /// The only message a client ever sees when this endpoint fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Predict => "Failed to get prediction",
            Self::Batch => "Failed to process batch predictions",
            Self::ModelInfo => "Failed to get model info",
            Self::Retrain => "Failed to initiate retraining",
            Self::Train => "Failed to train model",
            Self::Status => "Failed to reach prediction backend",
        }
    }
}

/// One part of a multipart form, kept byte-for-byte.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub enum RelayBody {
    Empty,
    Json(Value),
    Form(Vec<FormPart>),
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("unreadable request body: {0}")]
    Request(String),

    #[error("backend request failed: {0}")]
    Transport(String),

    #[error("backend responded with status {0}")]
    Status(u16),

    #[error("backend returned malformed JSON: {0}")]
    Decode(String),
}

#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Send `body` to `endpoint` and return the backend's JSON reply untouched
    async fn forward(&self, endpoint: Endpoint, body: RelayBody) -> Result<Value, RelayError>;
}
