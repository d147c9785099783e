//! Upload-facing request handler
//!
//! Framework independent: a web layer builds an [`AnalysisRequest`] from a
//! multipart form and returns the [`AnalysisResponse`] status and JSON body.

use crate::clock::{Clock, SystemClock};
use crate::config::AnalysisConfig;
use crate::data::{DataLoader, SourceFormat};
use crate::error::{ForecastError, Result};
use crate::pipeline::{analyze_series, AnalysisReport};
use crate::validation::{UserParameters, Validator};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Form field holding the inflation rate in percent
pub const INFLATION_FIELD: &str = "inflation_rate";
/// Form field holding the interest rate in percent
pub const INTEREST_FIELD: &str = "interest_rate";
/// Form field holding the growth factor
pub const GROWTH_FIELD: &str = "growth_factor";

/// A file received with the request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new<S: Into<String>>(filename: S, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Lower-case extension of the file name, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }
}

/// One analysis request: an optional upload plus form fields
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub file: Option<UploadedFile>,
    pub form: HashMap<String, String>,
}

impl AnalysisRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file: UploadedFile) -> Self {
        self.file = Some(file);
        self
    }

    pub fn with_field<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.form.insert(key.into(), value.into());
        self
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.form.get(key).map(String::as_str)
    }
}

/// Status code and JSON body returned to the client
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResponse {
    pub status: u16,
    pub body: Value,
}

impl AnalysisResponse {
    fn failure(status: u16, error: &str, details: String) -> Self {
        Self {
            status,
            body: json!({
                "error": error,
                "details": details,
                "status": status,
            }),
        }
    }

    fn from_error(error: &ForecastError) -> Self {
        let status = error.status_code();
        let label = if error.is_client_error() {
            "Processing failed"
        } else {
            "Server error"
        };
        Self::failure(status, label, error.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Handles analysis requests against one configuration
pub struct Service {
    config: AnalysisConfig,
    clock: Box<dyn Clock + Send + Sync>,
}

impl Service {
    /// Create a service using the system clock
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create a service with an explicit clock
    pub fn with_clock<C: Clock + Send + Sync + 'static>(config: AnalysisConfig, clock: C) -> Self {
        Self {
            config,
            clock: Box::new(clock),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Handle one request; never panics on bad input
    pub fn handle(&self, request: &AnalysisRequest) -> AnalysisResponse {
        let service = &self.config.service;

        let file = match &request.file {
            Some(file) => file,
            None => {
                return AnalysisResponse::failure(
                    400,
                    "No file part in request",
                    "Include file in form data with key \"file\"".to_string(),
                )
            }
        };

        if file.filename.trim().is_empty() {
            return AnalysisResponse::failure(
                400,
                "No file selected",
                "Select a file before uploading".to_string(),
            );
        }

        let extension = match file.extension() {
            Some(ext) if service.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)) => ext,
            _ => {
                return AnalysisResponse::failure(
                    400,
                    "Invalid file type",
                    format!("Allowed types: {}", service.allowed_extensions.join(", ")),
                )
            }
        };

        if file.bytes.len() > service.max_upload_bytes {
            return AnalysisResponse::failure(
                413,
                "File too large",
                format!(
                    "Upload of {} bytes exceeds the limit of {} bytes",
                    file.bytes.len(),
                    service.max_upload_bytes
                ),
            );
        }

        info!(filename = %file.filename, bytes = file.bytes.len(), "processing upload");

        match self.process(file, &extension, request) {
            Ok(report) => self.success(report),
            Err(error) => {
                warn!(filename = %file.filename, %error, "analysis failed");
                AnalysisResponse::from_error(&error)
            }
        }
    }

    fn process(
        &self,
        file: &UploadedFile,
        extension: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport> {
        let format = match file.content_type.as_deref().map(SourceFormat::from_content_type) {
            Some(Ok(format)) => format,
            _ => SourceFormat::from_filename(&file.filename)?,
        };

        let uploads_dir = &self.config.service.uploads_dir;
        fs::create_dir_all(uploads_dir)?;

        // removed when `staged` drops, on every return path
        let mut staged = tempfile::Builder::new()
            .prefix("upload_")
            .suffix(&format!(".{}", extension))
            .tempfile_in(uploads_dir)?;
        staged.write_all(&file.bytes)?;
        staged.flush()?;

        // parse the staged copy, not the request buffer
        let bytes = fs::read(staged.path())?;
        let table = DataLoader::from_bytes(&bytes, format)?;
        let series = Validator::validate_table(&table)?;

        let params = UserParameters::parse(
            request.field(INFLATION_FIELD),
            request.field(INTEREST_FIELD),
            request.field(GROWTH_FIELD),
        )?;

        analyze_series(&series, &params, &self.config, self.clock.as_ref())
    }

    fn success(&self, report: AnalysisReport) -> AnalysisResponse {
        let visualizations = match report.visualizations {
            Ok(manifest) => manifest,
            Err(error) => return AnalysisResponse::from_error(&error),
        };

        AnalysisResponse {
            status: 200,
            body: json!({
                "status": 200,
                "predictions": report.predictions,
                "visualizations": visualizations,
                "file_saved": report.results_file,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        let file = UploadedFile::new("Report.CSV", Vec::new());
        assert_eq!(file.extension().as_deref(), Some("csv"));
        assert_eq!(UploadedFile::new("README", Vec::new()).extension(), None);
    }

    #[test]
    fn test_client_errors_are_processing_failures() {
        let response = AnalysisResponse::from_error(&ForecastError::InvalidParameters("x".into()));
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "Processing failed");

        let response = AnalysisResponse::from_error(&ForecastError::InsufficientData("x".into()));
        assert_eq!(response.status, 500);
        assert_eq!(response.body["error"], "Server error");
    }
}
