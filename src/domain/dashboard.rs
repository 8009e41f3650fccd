// Dashboard view models - Formatted payloads for the browser views
use serde::Serialize;

use super::location::Location;
use super::model::{ModelInfo, group_thousands};
use super::prediction::{AqiBand, Pollutants, PredictionResult, round_display};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantReadings {
    pub pm2_5: String,
    pub pm10: String,
    pub no2: String,
    pub o3: String,
    pub unit: &'static str,
}

impl From<&Pollutants> for PollutantReadings {
    fn from(p: &Pollutants) -> Self {
        Self {
            pm2_5: round_display(p.pm2_5),
            pm10: round_display(p.pm10),
            no2: round_display(p.no2),
            o3: round_display(p.o3),
            unit: "μg/m³",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionView {
    pub aqi: String,
    pub band: AqiBand,
    pub level: &'static str,
    pub color: &'static str,
    pub pollutants: PollutantReadings,
    pub location: Location,
    pub timestamp: String,
    pub data_sources: String,
}

impl From<PredictionResult> for PredictionView {
    fn from(result: PredictionResult) -> Self {
        let band = AqiBand::classify(result.predictions.aqi);
        Self {
            aqi: round_display(result.predictions.aqi),
            band,
            level: band.label(),
            color: band.color(),
            pollutants: PollutantReadings::from(&result.predictions),
            location: result.location,
            timestamp: format_timestamp(&result.timestamp),
            data_sources: result.data_sources.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub location: String,
    pub aqi: String,
    pub color: &'static str,
    pub pollutants: PollutantReadings,
}

impl From<&PredictionResult> for BatchRow {
    fn from(result: &PredictionResult) -> Self {
        Self {
            location: result.location.display_short(),
            aqi: round_display(result.predictions.aqi),
            color: AqiBand::classify(result.predictions.aqi).color(),
            pollutants: PollutantReadings::from(&result.predictions),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchView {
    pub rows: Vec<BatchRow>,
    pub summary: String,
}

impl BatchView {
    pub fn new(results: &[PredictionResult]) -> Self {
        Self {
            rows: results.iter().map(BatchRow::from).collect(),
            summary: format!("Successfully processed {} locations", results.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfoView {
    pub model_name: String,
    pub trained_date: String,
    pub trained_time: String,
    pub data_size: String,
}

impl From<ModelInfo> for ModelInfoView {
    fn from(info: ModelInfo) -> Self {
        let (trained_date, trained_time) = match info.trained_at() {
            Some(at) => (
                at.format("%Y-%m-%d").to_string(),
                at.format("%H:%M:%S").to_string(),
            ),
            None => (info.trained_on.clone(), String::new()),
        };

        Self {
            model_name: info.model_name,
            trained_date,
            trained_time,
            data_size: format!("{} samples", group_thousands(info.data_size)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrainView {
    pub message: String,
    /// Clients should fetch model info again after this many milliseconds.
    pub refresh_after_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadView {
    pub message: String,
    pub file_name: String,
    pub size: String,
}

fn format_timestamp(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => raw.to_string(),
    }
}
