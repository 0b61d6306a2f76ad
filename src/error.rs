//! Unified error handling for the Brainrot Dex CLI
//!
//! This module provides:
//! - Unique error codes for debugging and documentation
//! - Structured error information with context
//! - Convenient constructor methods
//! - Automatic conversions from common error types
//!
//! Generation failures never escape the orchestrator as errors; they are
//! folded into session state. Everything below the orchestrator (HTTP client,
//! config, export) reports through [`BrainrotError`].

use std::fmt;
use thiserror::Error;

/// Unified Result type for all Brainrot Dex operations
pub type Result<T> = std::result::Result<T, BrainrotError>;

/// Error codes for Brainrot Dex operations
///
/// Each error has a unique code in the format `BXXX` where:
/// - B1XX: Network and API errors
/// - B2XX: Configuration errors
/// - B3XX: Validation errors
/// - B4XX: Generation errors
/// - B5XX: File and I/O errors
/// - B6XX: UI and interaction errors
/// - B9XX: Internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Network (B1XX)
    /// B101: HTTP request failed
    HttpError,
    /// B102: Connection timeout
    ConnectionTimeout,
    /// B103: Connection refused
    ConnectionRefused,
    /// B104: API returned error response
    ApiError,
    /// B105: Invalid API response format
    InvalidResponse,

    // Configuration (B2XX)
    /// B201: Configuration error
    ConfigError,
    /// B202: Missing configuration (e.g. API key)
    MissingConfig,

    // Validation (B3XX)
    /// B302: Validation failed
    ValidationFailed,

    // Generation (B4XX)
    /// B401: Model returned no usable concepts
    NoConcepts,
    /// B402: Model returned no image payload
    NoImage,
    /// B403: Prompt blocked by the service
    PromptBlocked,

    // File/IO (B5XX)
    /// B501: File not found
    FileNotFound,
    /// B502: File read error
    FileReadError,
    /// B503: File write error
    FileWriteError,
    /// B504: Malformed data URI
    InvalidDataUri,

    // UI (B6XX)
    /// B601: Dialog error
    DialogError,

    // Internal (B9XX)
    /// B901: Internal error
    InternalError,
    /// B902: Serialization error
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::HttpError => 101,
            ErrorCode::ConnectionTimeout => 102,
            ErrorCode::ConnectionRefused => 103,
            ErrorCode::ApiError => 104,
            ErrorCode::InvalidResponse => 105,

            ErrorCode::ConfigError => 201,
            ErrorCode::MissingConfig => 202,

            ErrorCode::ValidationFailed => 302,

            ErrorCode::NoConcepts => 401,
            ErrorCode::NoImage => 402,
            ErrorCode::PromptBlocked => 403,

            ErrorCode::FileNotFound => 501,
            ErrorCode::FileReadError => 502,
            ErrorCode::FileWriteError => 503,
            ErrorCode::InvalidDataUri => 504,

            ErrorCode::DialogError => 601,

            ErrorCode::InternalError => 901,
            ErrorCode::SerializationError => 902,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.code())
    }
}

/// Main error type for all Brainrot Dex operations
#[derive(Error, Debug)]
pub enum BrainrotError {
    // ==================== Network Errors (B1XX) ====================
    /// HTTP/Network error
    #[error("[{code}] Network error: {message}")]
    Network {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// API error with status code
    #[error("[{code}] API error ({status}): {message}")]
    Api {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    // ==================== Configuration Errors (B2XX) ====================
    /// Configuration error
    #[error("[{code}] Configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<config::ConfigError>,
    },

    // ==================== Validation Errors (B3XX) ====================
    /// Validation error
    #[error("[{code}] Validation error: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        field: Option<String>,
    },

    // ==================== Generation Errors (B4XX) ====================
    /// Generation produced nothing usable
    #[error("[{code}] Generation failed: {message}")]
    Generation { code: ErrorCode, message: String },

    // ==================== File/IO Errors (B5XX) ====================
    /// File or IO error
    #[error("[{code}] {context}: {message}")]
    Io {
        code: ErrorCode,
        context: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ==================== UI Errors (B6XX) ====================
    /// UI/Dialog error
    #[error("[{code}] UI error: {message}")]
    Ui { code: ErrorCode, message: String },

    // ==================== Internal Errors (B9XX) ====================
    /// Internal/Unexpected error
    #[error("[{code}] Internal error: {message}")]
    Internal { code: ErrorCode, message: String },

    /// JSON serialization error
    #[error("[{code}] Serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

// ==================== Constructor Methods ====================

impl BrainrotError {
    // --- Network ---

    /// Create network error from reqwest error
    pub fn network_from_reqwest(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::ConnectionTimeout
        } else if err.is_connect() {
            ErrorCode::ConnectionRefused
        } else {
            ErrorCode::HttpError
        };

        Self::Network {
            code,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::ApiError,
            status,
            message: message.into(),
        }
    }

    /// Create invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::InvalidResponse,
            status: 0,
            message: message.into(),
        }
    }

    // --- Configuration ---

    /// Create missing configuration error
    pub fn missing_config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::MissingConfig,
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration error with source
    pub fn config_from_error(err: config::ConfigError) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: err.to_string(),
            source: Some(err),
        }
    }

    // --- Validation ---

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            field: None,
        }
    }

    /// Create validation error with field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            field: Some(field.into()),
        }
    }

    // --- Generation ---

    /// Text model returned no usable concepts
    pub fn no_concepts(message: impl Into<String>) -> Self {
        Self::Generation {
            code: ErrorCode::NoConcepts,
            message: message.into(),
        }
    }

    /// Image model returned no inline image
    pub fn no_image(message: impl Into<String>) -> Self {
        Self::Generation {
            code: ErrorCode::NoImage,
            message: message.into(),
        }
    }

    /// Prompt was blocked by the service
    pub fn prompt_blocked(reason: impl Into<String>) -> Self {
        Self::Generation {
            code: ErrorCode::PromptBlocked,
            message: format!("prompt blocked: {}", reason.into()),
        }
    }

    // --- File/IO ---

    /// Create IO error from std::io::Error
    pub fn io_from_error(context: impl Into<String>, err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::FileWriteError,
            _ => ErrorCode::FileReadError,
        };

        Self::Io {
            code,
            context: context.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create malformed data URI error
    pub fn invalid_data_uri(message: impl Into<String>) -> Self {
        Self::Io {
            code: ErrorCode::InvalidDataUri,
            context: "Invalid data URI".to_string(),
            message: message.into(),
            source: None,
        }
    }

    // --- Internal ---

    /// Create internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    // --- Utility Methods ---

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network { code, .. } => *code,
            Self::Api { code, .. } => *code,
            Self::Config { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::Generation { code, .. } => *code,
            Self::Io { code, .. } => *code,
            Self::Ui { code, .. } => *code,
            Self::Internal { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Api { status: 500, .. }
                | Self::Api { status: 503, .. }
                | Self::Api { status: 429, .. }
        )
    }
}

// ==================== From Implementations ====================

impl From<std::io::Error> for BrainrotError {
    fn from(err: std::io::Error) -> Self {
        Self::io_from_error("IO operation", err)
    }
}

impl From<reqwest::Error> for BrainrotError {
    fn from(err: reqwest::Error) -> Self {
        Self::network_from_reqwest(err)
    }
}

impl From<serde_json::Error> for BrainrotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<config::ConfigError> for BrainrotError {
    fn from(err: config::ConfigError) -> Self {
        Self::config_from_error(err)
    }
}

impl From<validator::ValidationErrors> for BrainrotError {
    fn from(err: validator::ValidationErrors) -> Self {
        let message = err.to_string();
        match err.field_errors().keys().min() {
            Some(field) => Self::validation_field(message, field.to_string()),
            None => Self::validation(message),
        }
    }
}

impl From<dialoguer::Error> for BrainrotError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Ui {
            code: ErrorCode::DialogError,
            message: format!("Dialog error: {}", err),
        }
    }
}

impl From<base64::DecodeError> for BrainrotError {
    fn from(err: base64::DecodeError) -> Self {
        Self::invalid_data_uri(format!("base64 payload: {}", err))
    }
}
