// Training upload - an opaque CSV payload forwarded to the backend as-is
use bytes::Bytes;

use super::validation::ValidationError;

#[derive(Debug, Clone)]
pub struct TrainingUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl TrainingUpload {
    /// Accept the upload only if it looks like a CSV file. The contents are not inspected.
    pub fn validate(
        file_name: String,
        content_type: Option<String>,
        bytes: Bytes,
    ) -> Result<Self, ValidationError> {
        if !is_csv(&file_name, content_type.as_deref()) {
            return Err(ValidationError::NotCsv);
        }
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn size_display(&self) -> String {
        format!("{:.2} MB", self.bytes.len() as f64 / 1024.0 / 1024.0)
    }
}

pub fn is_csv(file_name: &str, content_type: Option<&str>) -> bool {
    let mime_is_csv = content_type
        .map(|ct| ct.split(';').next().unwrap_or("").trim().eq_ignore_ascii_case("text/csv"))
        .unwrap_or(false);

    mime_is_csv || file_name.to_ascii_lowercase().ends_with(".csv")
}
