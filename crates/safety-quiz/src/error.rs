use crate::assessment::{ConfigurationError, UsageError};
use crate::config::ConfigError;
use crate::content::{ContentError, ImportError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Content(ContentError),
    Import(ImportError),
    Bank(ConfigurationError),
    Quiz(UsageError),
    Json(serde_json::Error),
    Input(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Content(err) => write!(f, "content error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Bank(err) => write!(f, "question bank error: {}", err),
            AppError::Quiz(err) => write!(f, "quiz error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::Input(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Content(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Bank(err) => Some(err),
            AppError::Quiz(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Input(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ContentError> for AppError {
    fn from(value: ContentError) -> Self {
        Self::Content(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ConfigurationError> for AppError {
    fn from(value: ConfigurationError) -> Self {
        Self::Bank(value)
    }
}

impl From<UsageError> for AppError {
    fn from(value: UsageError) -> Self {
        Self::Quiz(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
