// Relay service - Forwards requests to the prediction backend and normalizes failures
use crate::application::backend::{Endpoint, FormPart, PredictionBackend, RelayBody};
use crate::domain::location::Location;
use crate::domain::model::{ModelInfo, StatusMessage};
use crate::domain::prediction::PredictionResult;
use crate::domain::upload::TrainingUpload;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// A failed relay. The cause is logged, never carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", .endpoint.failure_message())]
pub struct RelayFailure {
    pub endpoint: Endpoint,
}

#[derive(Clone)]
pub struct RelayService {
    backend: Arc<dyn PredictionBackend>,
}

impl RelayService {
    pub fn new(backend: Arc<dyn PredictionBackend>) -> Self {
        Self { backend }
    }

    /// Forward `body` verbatim and hand back whatever JSON the backend produced.
    pub async fn relay(&self, endpoint: Endpoint, body: RelayBody) -> Result<Value, RelayFailure> {
        tracing::debug!(path = endpoint.path(), "Relaying request to prediction backend");

        self.backend.forward(endpoint, body).await.map_err(|e| {
            tracing::warn!(path = endpoint.path(), error = %e, "Prediction backend relay failed");
            RelayFailure { endpoint }
        })
    }

    pub async fn predict(&self, location: Location) -> Result<PredictionResult, RelayFailure> {
        let body = encode(Endpoint::Predict, &location)?;
        self.fetch(Endpoint::Predict, body).await
    }

    pub async fn batch(
        &self,
        locations: &[Location],
    ) -> Result<Vec<PredictionResult>, RelayFailure> {
        let body = encode(Endpoint::Batch, &locations)?;
        self.fetch(Endpoint::Batch, body).await
    }

    pub async fn model_info(&self) -> Result<ModelInfo, RelayFailure> {
        self.fetch(Endpoint::ModelInfo, RelayBody::Empty).await
    }

    pub async fn retrain(&self) -> Result<StatusMessage, RelayFailure> {
        self.fetch(Endpoint::Retrain, RelayBody::Empty).await
    }

    pub async fn train(&self, upload: TrainingUpload) -> Result<StatusMessage, RelayFailure> {
        let part = FormPart {
            name: "file".to_string(),
            file_name: Some(upload.file_name),
            content_type: upload.content_type,
            data: upload.bytes,
        };
        self.fetch(Endpoint::Train, RelayBody::Form(vec![part])).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: RelayBody,
    ) -> Result<T, RelayFailure> {
        let value = self.relay(endpoint, body).await?;
        serde_json::from_value(value).map_err(|e| {
            tracing::warn!(
                path = endpoint.path(),
                error = %e,
                "Unexpected prediction backend payload"
            );
            RelayFailure { endpoint }
        })
    }
}

fn encode<T: Serialize + ?Sized>(
    endpoint: Endpoint,
    payload: &T,
) -> Result<RelayBody, RelayFailure> {
    serde_json::to_value(payload).map(RelayBody::Json).map_err(|e| {
        tracing::warn!(path = endpoint.path(), error = %e, "Failed to encode relay payload");
        RelayFailure { endpoint }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake_backend::FakeBackend;
    use bytes::Bytes;
    use serde_json::json;

    fn prediction_json(lat: f64, lng: f64, aqi: f64) -> Value {
        json!({
            "predictions": {"pm2_5": 10, "pm10": 20, "no2": 5, "o3": 15, "aqi": aqi},
            "location": {"latitude": lat, "longitude": lng},
            "timestamp": "2024-05-01T10:30:00Z",
            "data_sources": ["weather_api", "google_earth"]
        })
    }

    #[tokio::test]
    async fn test_relay_returns_backend_json_unchanged() {
        let reply = json!({"status": "ok", "nested": {"values": [1, 2, 3]}});
        let backend = Arc::new(FakeBackend::new().with_reply(Endpoint::Predict, reply.clone()));
        let service = RelayService::new(backend.clone());

        let body = RelayBody::Json(json!({"latitude": 1.0, "longitude": 2.0}));
        assert_eq!(service.relay(Endpoint::Predict, body).await, Ok(reply));
        assert_eq!(backend.call_count(Endpoint::Predict), 1);
    }

    #[tokio::test]
    async fn test_relay_failure_is_generic() {
        let backend = Arc::new(FakeBackend::new().with_status(Endpoint::Retrain, 422));
        let service = RelayService::new(backend);

        let err = service.retrain().await.unwrap_err();
        assert_eq!(err.endpoint, Endpoint::Retrain);
        assert_eq!(err.to_string(), "Failed to initiate retraining");
    }

    #[tokio::test]
    async fn test_predict_sends_location() {
        let reply = prediction_json(28.6139, 77.209, 42.0);
        let backend = Arc::new(FakeBackend::new().with_reply(Endpoint::Predict, reply));
        let service = RelayService::new(backend.clone());

        let result = service.predict(Location::new(28.6139, 77.209)).await.unwrap();
        assert_eq!(result.predictions.aqi, 42.0);
        assert_eq!(result.data_sources.len(), 2);

        match &backend.calls()[0].1 {
            RelayBody::Json(v) => assert_eq!(v, &json!({"latitude": 28.6139, "longitude": 77.209})),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let reply = json!([
            prediction_json(1.0, 2.0, 10.0),
            prediction_json(3.0, 4.0, 120.0),
        ]);
        let backend = Arc::new(FakeBackend::new().with_reply(Endpoint::Batch, reply));
        let service = RelayService::new(backend);

        let rows = service
            .batch(&[Location::new(1.0, 2.0), Location::new(3.0, 4.0)])
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].location, Location::new(3.0, 4.0));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_a_failure() {
        let backend =
            Arc::new(FakeBackend::new().with_reply(Endpoint::ModelInfo, json!({"oops": true})));
        let service = RelayService::new(backend);

        let err = service.model_info().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to get model info");
    }

    #[tokio::test]
    async fn test_train_forwards_file_field() {
        let backend = Arc::new(
            FakeBackend::new().with_reply(Endpoint::Train, json!({"message": "Model trained"})),
        );
        let service = RelayService::new(backend.clone());
        let upload = TrainingUpload::validate(
            "readings.csv".into(),
            Some("text/csv".into()),
            Bytes::from_static(b"latitude,longitude,pm2_5,pm10,no2,o3,aqi\n"),
        )
        .unwrap();

        let reply = service.train(upload).await.unwrap();
        assert_eq!(reply.message.as_deref(), Some("Model trained"));

        match &backend.calls()[0].1 {
            RelayBody::Form(parts) => {
                assert_eq!(parts.len(), 1);
                assert_eq!(parts[0].name, "file");
                assert_eq!(parts[0].file_name.as_deref(), Some("readings.csv"));
                assert!(parts[0].data.starts_with(b"latitude,"));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }
}
