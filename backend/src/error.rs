//! Error types for the EDI ingestion crate.
//!
//! Parsing text never fails: every defect in a document is reported as a
//! [`crate::models::Diagnostic`]. The types here cover the edges around the
//! pipeline instead:
//!
//! - [`DecodeError`] - Turning uploaded bytes into text
//! - [`ConfigError`] - Invalid environment or CLI configuration
//! - [`IngestError`] - Top-level file ingestion errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Decoding Errors
// =============================================================================

/// Errors while decoding raw bytes into text.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Encoding name not recognised.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Bytes are not valid in the requested encoding.
    #[error("Input is not valid {0}")]
    Malformed(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in environment or command-line configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Separator list empty or containing forbidden characters.
    #[error("Invalid separator set '{value}': {reason}")]
    InvalidSeparators { value: String, reason: String },

    /// Unknown validation profile.
    #[error("Unknown validation profile '{0}' (expected 'lenient' or 'strict')")]
    UnknownProfile(String),

    /// Unknown log format.
    #[error("Unknown log format '{0}' (expected 'pretty' or 'json')")]
    UnknownLogFormat(String),

    /// Variable present but not parseable.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

// =============================================================================
// Ingestion Errors (top-level)
// =============================================================================

/// Top-level errors when ingesting a file.
///
/// This is the error type returned by [`crate::pipeline::parse_file`].
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Bad configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension not accepted by the upload surface.
    #[error("Unsupported file type '{0}' (expected .edi, .x12 or .txt)")]
    UnsupportedExtension(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
///
/// Handlers return these directly; the axum response mapping lives in
/// [`crate::api::types`].
#[derive(Debug, Error)]
pub enum ServerError {
    /// Ingestion error.
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Listener could not be bound or served.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload larger than the configured limit.
    #[error("File is {size} bytes, limit is {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },
}

impl ServerError {
    /// Whether the client sent something unusable (as opposed to a server fault).
    pub fn is_client_error(&self) -> bool {
        match self {
            ServerError::BadRequest(_) | ServerError::PayloadTooLarge { .. } => true,
            ServerError::Ingest(e) => matches!(
                e,
                IngestError::UnsupportedExtension(_) | IngestError::Decode(_) | IngestError::Config(_)
            ),
            ServerError::Io(_) => false,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
