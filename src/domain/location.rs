// Location domain model and coordinate parsing
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a location from the two raw text fields of the prediction form.
    pub fn from_form(latitude: &str, longitude: &str) -> Result<Self, ValidationError> {
        let (latitude, longitude) = (latitude.trim(), longitude.trim());
        if latitude.is_empty() || longitude.is_empty() {
            return Err(ValidationError::MissingCoordinates);
        }

        match (parse_coordinate(latitude), parse_coordinate(longitude)) {
            (Some(lat), Some(lng)) => Ok(Self::new(lat, lng)),
            _ => Err(ValidationError::InvalidFormCoordinates),
        }
    }

    /// Render as "lat, lng" with four decimal places.
    pub fn display_short(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Parse free text with one "latitude, longitude" pair per line.
///
/// A single bad line rejects the whole submission.
pub fn parse_batch(text: &str) -> Result<Vec<Location>, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }

    text.lines()
        .enumerate()
        .map(|(idx, line)| {
            parse_line(line).ok_or(ValidationError::InvalidCoordinates { line: idx + 1 })
        })
        .collect()
}

fn parse_line(line: &str) -> Option<Location> {
    let mut fields = line.split(',');
    let lat = parse_coordinate(fields.next()?)?;
    let lng = parse_coordinate(fields.next()?)?;
    if fields.next().is_some() {
        return None;
    }
    Some(Location::new(lat, lng))
}

// f64::from_str accepts "NaN" and "inf"; neither is a coordinate.
fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
