// HTTP implementation of the prediction backend
use crate::application::backend::{Endpoint, FormPart, PredictionBackend, RelayBody, RelayError};
use crate::infrastructure::config::BackendSettings;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    settings: BackendSettings,
}

impl HttpBackend {
    pub fn new(settings: BackendSettings) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client, settings })
    }

    fn build_form(parts: Vec<FormPart>) -> Result<Form, RelayError> {
        let mut form = Form::new();
        for part in parts {
            let mut field = Part::bytes(part.data.to_vec());
            if let Some(file_name) = part.file_name {
                field = field.file_name(file_name);
            }
            if let Some(content_type) = part.content_type {
                field = field
                    .mime_str(&content_type)
                    .map_err(|e| RelayError::Request(e.to_string()))?;
            }
            form = form.part(part.name, field);
        }
        Ok(form)
    }
}

#[async_trait]
impl PredictionBackend for HttpBackend {
    async fn forward(&self, endpoint: Endpoint, body: RelayBody) -> Result<Value, RelayError> {
        let url = self.settings.endpoint_url(endpoint.path());

        let request = if endpoint.is_get() {
            self.client.get(&url)
        } else {
            self.client.post(&url)
        };
        let request = match body {
            RelayBody::Empty => request,
            RelayBody::Json(value) => request.json(&value),
            RelayBody::Form(parts) => request.multipart(Self::build_form(parts)?),
        };

        let response = request.send().await.map_err(transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%url, %status, %body, "Prediction backend rejected request");
            return Err(RelayError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(|e| RelayError::Decode(e.to_string()))
    }
}

fn transport(err: reqwest::Error) -> RelayError {
    RelayError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use bytes::Bytes;
    use serde_json::json;

    async fn spawn_backend() -> String {
        let router = Router::new()
            .route(
                "/predict",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({"received": body, "predictions": {"aqi": 42}}))
                }),
            )
            .route("/model-info", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/retrain", post(|| async { "retraining, not json" }))
            .route(
                "/train",
                post(|mut multipart: Multipart| async move {
                    let mut seen = Vec::new();
                    while let Ok(Some(field)) = multipart.next_field().await {
                        let name = field.name().unwrap_or_default().to_string();
                        let file_name = field.file_name().unwrap_or_default().to_string();
                        let content_type = field.content_type().unwrap_or_default().to_string();
                        let len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
                        seen.push(json!([name, file_name, content_type, len]));
                    }
                    Json(json!({ "message": "trained", "fields": seen }))
                }),
            )
            .route("/", get(|| async { Json(json!({"message": "Backend is alive"})) }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn backend(base_url: String) -> HttpBackend {
        HttpBackend::new(BackendSettings {
            base_url,
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_forward_json_round_trip() {
        let backend = backend(spawn_backend().await);
        let payload = json!({"latitude": 28.6139, "longitude": 77.209});

        let reply = backend
            .forward(Endpoint::Predict, RelayBody::Json(payload.clone()))
            .await
            .unwrap();
        assert_eq!(reply, json!({"received": payload, "predictions": {"aqi": 42}}));
    }

    #[tokio::test]
    async fn test_forward_get_without_body() {
        let backend = backend(spawn_backend().await);
        let reply = backend.forward(Endpoint::Status, RelayBody::Empty).await.unwrap();
        assert_eq!(reply["message"], "Backend is alive");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let backend = backend(spawn_backend().await);
        let err = backend.forward(Endpoint::ModelInfo, RelayBody::Empty).await.unwrap_err();
        assert!(matches!(err, RelayError::Status(500)));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let backend = backend(spawn_backend().await);
        let err = backend.forward(Endpoint::Retrain, RelayBody::Empty).await.unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = backend(format!("http://{}", addr))
            .forward(Endpoint::Predict, RelayBody::Json(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
    }

    #[tokio::test]
    async fn test_multipart_file_is_forwarded() {
        let backend = backend(spawn_backend().await);
        let part = FormPart {
            name: "file".into(),
            file_name: Some("readings.csv".into()),
            content_type: Some("text/csv".into()),
            data: Bytes::from_static(b"latitude,longitude\n1,2\n"),
        };

        let reply = backend
            .forward(Endpoint::Train, RelayBody::Form(vec![part]))
            .await
            .unwrap();
        assert_eq!(reply["message"], "trained");
        assert_eq!(reply["fields"], json!([["file", "readings.csv", "text/csv", 23]]));
    }
}
