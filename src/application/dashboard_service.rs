// Dashboard service - Validates form input, relays it, and formats the result
use crate::application::backend::{Endpoint, FormPart};
use crate::application::relay_service::{RelayFailure, RelayService};
use crate::domain::dashboard::{BatchView, ModelInfoView, PredictionView, RetrainView, UploadView};
use crate::domain::location::{Location, parse_batch};
use crate::domain::upload::TrainingUpload;
use crate::domain::validation::ValidationError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{0}")]
    Unavailable(&'static str),
}

impl From<RelayFailure> for DashboardError {
    fn from(failure: RelayFailure) -> Self {
        Self::Unavailable(failure.endpoint.failure_message())
    }
}

#[derive(Clone)]
pub struct DashboardService {
    relay: RelayService,
    refresh_delay: Duration,
}

impl DashboardService {
    pub fn new(relay: RelayService, refresh_delay: Duration) -> Self {
        Self {
            relay,
            refresh_delay,
        }
    }

    pub async fn predict(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<PredictionView, DashboardError> {
        let location = Location::from_form(latitude, longitude)?;
        let result = self.relay.predict(location).await?;
        Ok(PredictionView::from(result))
    }

    pub async fn batch(&self, text: &str) -> Result<BatchView, DashboardError> {
        let locations = parse_batch(text).inspect_err(|e| {
            if let ValidationError::InvalidCoordinates { line } = e {
                tracing::debug!(line, "Rejected batch submission");
            }
        })?;

        let results = self.relay.batch(&locations).await?;
        tracing::info!(locations = locations.len(), "Batch prediction completed");
        Ok(BatchView::new(&results))
    }

    pub async fn model_info(&self) -> Result<ModelInfoView, DashboardError> {
        let info = self
            .relay
            .model_info()
            .await
            .map_err(|_| DashboardError::Unavailable("Failed to load model information"))?;
        Ok(ModelInfoView::from(info))
    }

    /// Start retraining and return at once.
    ///
    /// Completion is never tracked: model info is fetched one more time after
    /// the refresh delay, whether or not training has finished by then.
    pub async fn retrain(&self) -> Result<RetrainView, DashboardError> {
        let reply = self.relay.retrain().await?;
        self.schedule_model_refresh();

        Ok(RetrainView {
            message: reply.message_or("Model retraining initiated"),
            refresh_after_ms: self.refresh_delay.as_millis() as u64,
        })
    }

    pub async fn upload(&self, file: Option<FormPart>) -> Result<UploadView, DashboardError> {
        let file = file.ok_or(ValidationError::MissingFile)?;
        let upload = TrainingUpload::validate(
            file.file_name.unwrap_or_default(),
            file.content_type,
            file.data,
        )?;

        let file_name = upload.file_name.clone();
        let size = upload.size_display();
        tracing::info!(file = %file_name, size = %size, "Uploading training data");

        let reply = self.relay.train(upload).await?;
        Ok(UploadView {
            message: reply.message_or("Model trained successfully"),
            file_name,
            size,
        })
    }

    fn schedule_model_refresh(&self) {
        let relay = self.relay.clone();
        let delay = self.refresh_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match relay.model_info().await {
                Ok(info) => tracing::info!(
                    model = %info.model_name,
                    trained_on = %info.trained_on,
                    data_size = info.data_size,
                    "Model info refreshed after retraining"
                ),
                Err(e) => tracing::warn!(
                    path = Endpoint::ModelInfo.path(),
                    error = %e,
                    "Model info refresh failed"
                ),
            }
        });
    }
}
