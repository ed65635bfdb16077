//! Error types for echboard-core
//!
//! The synthesis components never fail; these types cover the boundary
//! around them (API, files, configuration) and the non-fatal diagnostics
//! raised while accepting a simulation payload.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for echboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // IO Errors
    // ===================
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse JSON in {path}: {message}")]
    JsonParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    // ===================
    // API Errors
    // ===================
    #[error("Request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API returned {status} for {url}: {message}")]
    ApiStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Scenario not found: {scenario_id}")]
    ScenarioNotFound { scenario_id: u32 },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

/// Severity level for payload diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Non-critical, can continue with degraded functionality
    Warning,
    /// The input could not be used
    Error,
}

/// Individual entry in a load report
#[derive(Debug, Clone)]
pub struct LoadError {
    pub source: String,
    pub message: String,
    pub severity: ErrorSeverity,
    /// Actionable suggestion for user (optional)
    pub suggestion: Option<String>,
}

impl LoadError {
    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: ErrorSeverity::Warning,
            suggestion: None,
        }
    }

    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: ErrorSeverity::Error,
            suggestion: None,
        }
    }

    /// Add an actionable suggestion to this error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create user-friendly error from CoreError with context-aware suggestions
    pub fn from_core_error(source: impl Into<String>, error: &CoreError) -> Self {
        let (message, suggestion) = match error {
            CoreError::Http { url, .. } => (
                format!("Cannot reach {}", url),
                Some("Check that the simulation API is running (--api-url)".to_string()),
            ),
            CoreError::ApiStatus {
                status: 404,
                message,
                ..
            } => (
                message.clone(),
                Some("List available scenarios with: echboard scenarios".to_string()),
            ),
            CoreError::JsonParse { path, message, .. } => (
                format!("Invalid JSON in {}: {}", path.display(), message),
                Some("Validate JSON syntax with: jq . <file>".to_string()),
            ),
            CoreError::FileNotFound { path } => (
                format!("No such file: {}", path.display()),
                Some("Save a result first with: echboard simulate <id> --save <file>".to_string()),
            ),
            CoreError::FileRead { path, .. } => (
                format!("Cannot read file: {}", path.display()),
                Some(format!("Check permissions: chmod +r {}", path.display())),
            ),
            _ => (error.to_string(), None),
        };

        let error = Self::error(source, message);
        match suggestion {
            Some(suggestion) => error.with_suggestion(suggestion),
            None => error,
        }
    }
}

/// Report of diagnostics collected while accepting a simulation result
///
/// Enables graceful degradation by tracking anomalies instead of
/// rejecting the whole payload.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub errors: Vec<LoadError>,
    /// Historical records produced after alignment
    pub records_aligned: usize,
    /// Forecast records produced after alignment
    pub forecast_records: usize,
    /// Regions whose arrays disagree with the date count
    pub truncated_regions: usize,
    /// Dates dropped to keep one record per month
    pub dropped_months: usize,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: LoadError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.errors.push(LoadError::warning(source, message));
    }

    /// Returns true if there are any errors (including warnings)
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns only warnings
    pub fn warnings(&self) -> impl Iterator<Item = &LoadError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ErrorSeverity::Warning)
    }

    /// Returns (warnings, errors)
    pub fn error_count(&self) -> (usize, usize) {
        let count = |severity| self.errors.iter().filter(|e| e.severity == severity).count();
        (count(ErrorSeverity::Warning), count(ErrorSeverity::Error))
    }
}

/// Degraded state of the current simulation view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedState {
    /// Everything present
    Healthy,
    /// Usable, but parts of the payload are missing or inconsistent
    PartialData {
        missing: Vec<String>,
        reason: String,
    },
}

impl DegradedState {
    pub fn is_healthy(&self) -> bool {
        matches!(self, DegradedState::Healthy)
    }

    pub fn is_degraded(&self) -> bool {
        !self.is_healthy()
    }
}
