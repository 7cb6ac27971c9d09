use crate::core::parser::ParseFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordWolfError {
    #[error("Text generation service failed: {message}")]
    ExternalService { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Invalid model response: {0}")]
    InvalidResponse(#[from] ParseFailure),

    #[error("Model returned the same term twice for one pair: {term}")]
    DuplicatePair { term: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

/// Coarse failure kinds seen by callers of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ExternalService,
    InvalidResponse,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WordWolfError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WordWolfError::ExternalService { .. } | WordWolfError::ApiError(_) => {
                ErrorCategory::ExternalService
            }
            WordWolfError::InvalidResponse(_) | WordWolfError::DuplicatePair { .. } => {
                ErrorCategory::InvalidResponse
            }
            WordWolfError::ConfigError { .. }
            | WordWolfError::InvalidConfigValueError { .. }
            | WordWolfError::MissingConfigError { .. } => ErrorCategory::Configuration,
            WordWolfError::IoError(_)
            | WordWolfError::SerializationError(_)
            | WordWolfError::ServerError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // one bad model answer only costs one request
            ErrorCategory::InvalidResponse => ErrorSeverity::Low,
            ErrorCategory::ExternalService => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Message safe to hand back to a game client.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::ExternalService | ErrorCategory::InvalidResponse => {
                "Failed to generate word pair".to_string()
            }
            ErrorCategory::Configuration => format!("Invalid request: {}", self),
            ErrorCategory::System => "Internal server error".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WordWolfError::ExternalService { .. } | WordWolfError::ApiError(_) => {
                "Check the API key, quota and network access to the text generation service"
            }
            WordWolfError::InvalidResponse(_) | WordWolfError::DuplicatePair { .. } => {
                "Retry the request; the model occasionally ignores the output format"
            }
            WordWolfError::MissingConfigError { .. } => {
                "Provide the missing value in the config file or environment"
            }
            WordWolfError::ConfigError { .. } | WordWolfError::InvalidConfigValueError { .. } => {
                "Fix the configuration or request parameters and try again"
            }
            WordWolfError::IoError(_) => "Check file paths and permissions",
            WordWolfError::SerializationError(_) => "Check the JSON payload",
            WordWolfError::ServerError { .. } => "Check that the listen address is free",
        }
    }
}

pub type Result<T> = std::result::Result<T, WordWolfError>;
