use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How a generative backend call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendErrorKind {
    AuthInvalid,
    QuotaExceeded,
    Malformed,
    Timeout,
    Unknown,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BackendErrorKind::AuthInvalid => "auth_invalid",
            BackendErrorKind::QuotaExceeded => "quota_exceeded",
            BackendErrorKind::Malformed => "malformed",
            BackendErrorKind::Timeout => "timeout",
            BackendErrorKind::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
    /// HTTP status of the reply this error was classified from, if any.
    pub status: Option<u16>,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Marks the kind as derived from an HTTP status and error code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::AuthInvalid, message)
    }

    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::QuotaExceeded, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Malformed, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Timeout, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Unknown, message)
    }

    /// Errors the orchestrator answers with the offline catalog instead of surfacing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind,
            BackendErrorKind::QuotaExceeded
                | BackendErrorKind::Malformed
                | BackendErrorKind::Timeout
        )
    }

    /// Last-resort classification of an `Unknown` error from its message text.
    ///
    /// Errors that carry an HTTP status were already classified from it and
    /// are returned unchanged.
    pub fn reclassified(self) -> Self {
        if self.kind != BackendErrorKind::Unknown || self.status.is_some() {
            return self;
        }
        match classify_message(&self.message) {
            Some(kind) => Self { kind, ..self },
            None => self,
        }
    }
}

/// Substring heuristic over free-form error text.
pub fn classify_message(message: &str) -> Option<BackendErrorKind> {
    let lowered = message.to_lowercase();
    if lowered.contains("429") || lowered.contains("quota") || lowered.contains("rate limit") {
        Some(BackendErrorKind::QuotaExceeded)
    } else if lowered.contains("401")
        || lowered.contains("invalid api key")
        || lowered.contains("unauthorized")
    {
        Some(BackendErrorKind::AuthInvalid)
    } else {
        None
    }
}

#[derive(Error, Debug)]
pub enum EcosyncError {
    #[error("Analysis backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation error on '{field}': {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Not found: {what}")]
    NotFound { what: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Backend,
    Configuration,
    Input,
    Storage,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EcosyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EcosyncError::Backend(_) | EcosyncError::Http(_) => ErrorCategory::Backend,
            EcosyncError::ConfigError { .. } | EcosyncError::TomlParse(_) => {
                ErrorCategory::Configuration
            }
            EcosyncError::ValidationError { .. } | EcosyncError::SerializationError(_) => {
                ErrorCategory::Input
            }
            EcosyncError::NotFound { .. } => ErrorCategory::Storage,
            EcosyncError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EcosyncError::Backend(e) => match e.kind {
                BackendErrorKind::AuthInvalid => ErrorSeverity::Critical,
                BackendErrorKind::Unknown => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            EcosyncError::Http(_) => ErrorSeverity::Medium,
            EcosyncError::NotFound { .. } => ErrorSeverity::Low,
            EcosyncError::ConfigError { .. }
            | EcosyncError::TomlParse(_)
            | EcosyncError::ValidationError { .. }
            | EcosyncError::SerializationError(_)
            | EcosyncError::IoError(_) => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EcosyncError::Backend(e) => match e.kind {
                BackendErrorKind::AuthInvalid => {
                    "Provide a valid API key via OPENAI_API_KEY, the config file or --api-key, or rerun with --demo".to_string()
                }
                BackendErrorKind::QuotaExceeded => {
                    "Check the API billing and available credits, or rerun with --demo".to_string()
                }
                BackendErrorKind::Timeout => {
                    "Raise the request timeout or try again later".to_string()
                }
                BackendErrorKind::Malformed => {
                    "Retry the analysis; the backend returned an unexpected response".to_string()
                }
                BackendErrorKind::Unknown => {
                    "Check the backend URL and model name, or set analysis.fallback_on_unknown".to_string()
                }
            },
            EcosyncError::Http(_) => "Check network connectivity to the backend".to_string(),
            EcosyncError::ConfigError { .. } | EcosyncError::TomlParse(_) => {
                "Fix the configuration file and try again".to_string()
            }
            EcosyncError::ValidationError { field, .. } => {
                format!("Correct the '{}' field of the project input", field)
            }
            EcosyncError::SerializationError(_) => {
                "Make sure the project file is valid JSON or TOML".to_string()
            }
            EcosyncError::NotFound { .. } => "Check the project id".to_string(),
            EcosyncError::IoError(_) => "Check that the file exists and is readable".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EcosyncError::Backend(e) => match e.kind {
                BackendErrorKind::AuthInvalid => "Invalid or missing API key".to_string(),
                BackendErrorKind::QuotaExceeded => "API quota exceeded".to_string(),
                BackendErrorKind::Timeout => "The analysis backend timed out".to_string(),
                BackendErrorKind::Malformed => {
                    "The analysis backend returned an unreadable response".to_string()
                }
                BackendErrorKind::Unknown => format!("Failed to analyze project: {}", e.message),
            },
            EcosyncError::ValidationError { field, reason } => {
                format!("Invalid project data ({}): {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EcosyncError>;
