//! Error types for the JatimGuide route planner.
//!
//! This module provides the error hierarchy for every stage of a planning
//! session: configuration, catalog loading, the generation service, and
//! itinerary generation itself.

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogKind;

/// The main error type for the route planner.
#[derive(Debug, Error)]
pub enum GuideError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog loading and lookup errors.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Generation service errors.
    #[error("Generation service error: {0}")]
    Service(#[from] ServiceError),

    /// Itinerary generation errors.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// Environment variable is missing.
    #[error("Missing environment variable: {name}")]
    MissingEnvVar {
        /// Name of the missing variable.
        name: String,
    },
}

/// Catalog loading and lookup errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file was not found.
    #[error("Catalog file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The catalog file could not be parsed.
    #[error("Failed to parse catalog: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// Two entries of the same kind share an id.
    #[error("Duplicate {kind} id {id} in catalog")]
    DuplicateId {
        /// Catalog kind holding the duplicate.
        kind: CatalogKind,
        /// The duplicated id.
        id: u32,
    },

    /// No entry with the requested id exists.
    #[error("No {kind} with id {id} in catalog")]
    UnknownItem {
        /// Catalog kind that was searched.
        kind: CatalogKind,
        /// The requested id.
        id: u32,
    },
}

/// Errors from the external generation service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Authentication failed.
    #[error("Generation service authentication failed: {message}")]
    AuthenticationFailed {
        /// Description of the auth failure.
        message: String,
    },

    /// API request failed.
    #[error("Generation service request failed: {status} - {message}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Rate limited.
    #[error("Generation service rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("Network error communicating with the generation service: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// Invalid response envelope from the API.
    #[error("Invalid response from the generation service: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },

    /// The call did not complete in time.
    #[error("Generation service did not respond within {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },
}

/// Errors produced while generating an itinerary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Missing or out-of-range trip input, detected before any I/O.
    #[error("Invalid trip parameters ({field}): {message}")]
    InvalidParameters {
        /// Input field that failed.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// Another generation is still in flight.
    #[error("Generation {sequence} is already in progress")]
    AlreadyInProgress {
        /// Sequence number of the in-flight generation.
        sequence: u64,
    },

    /// The service replied but the payload failed schema or shape checks.
    #[error("Malformed itinerary response: {message}")]
    MalformedResponse {
        /// Description of the shape problem.
        message: String,
    },

    /// No usable plan could be produced.
    #[error("Itinerary generation failed: {message}")]
    GenerationFailed {
        /// Description of the underlying failure.
        message: String,
    },

    /// The generation was abandoned or superseded and its result discarded.
    #[error("Generation {sequence} was superseded; its result was discarded")]
    Superseded {
        /// Sequence number of the discarded generation.
        sequence: u64,
    },
}

/// Result type alias for route planner operations.
pub type Result<T, E = GuideError> = std::result::Result<T, E>;

impl GuideError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            Self::Catalog(CatalogError::UnknownItem { kind, id }) => {
                format!("There is no {kind} with id {id}.")
            }
            Self::Catalog(_) => "The catalog could not be loaded.".to_string(),
            Self::Service(_) => {
                "Unable to reach the route generation service. Please check your internet connection."
                    .to_string()
            }
            Self::Generation(err) => err.user_message(),
            Self::Io(_) => "File operation failed. Please check file permissions.".to_string(),
        }
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl ServiceError {
    /// Creates an API request error.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiRequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::NetworkError { .. })
    }
}

impl GenerationError {
    /// Creates an invalid parameters error for a specific input field.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameters {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates a generation failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::GenerationFailed {
            message: message.into(),
        }
    }

    /// Returns the message shown to the traveler.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidParameters { message, .. } => {
                format!("Please fill in starting point and duration: {message}")
            }
            Self::AlreadyInProgress { .. } => {
                "A route is already being generated. Please wait for it to finish.".to_string()
            }
            Self::MalformedResponse { .. } | Self::GenerationFailed { .. } => {
                "An error occurred while generating the route. Please try again.".to_string()
            }
            Self::Superseded { .. } => {
                "This route request was replaced by a newer one.".to_string()
            }
        }
    }
}
