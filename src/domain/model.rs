// Model metadata and backend status replies
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub trained_on: String,
    pub data_size: u64,
}

impl ModelInfo {
    /// Parse `trained_on`, accepting RFC 3339 or a bare ISO-8601 datetime.
    pub fn trained_at(&self) -> Option<NaiveDateTime> {
        DateTime::parse_from_rfc3339(&self.trained_on)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(&self.trained_on, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }
}

/// Reply of the retrain and train endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusMessage {
    pub fn message_or(self, fallback: &str) -> String {
        self.message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Group digits in thousands: 1234567 -> "1,234,567".
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
