//! Error types for herolog.
//!
//! This module defines all error types used throughout the herolog crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::event::EventId;

/// The main error type for herolog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The serialized collection does not fit in the storage slot.
    #[error("storage slot full: {bytes} bytes needed, {limit} bytes available")]
    StorageCapacity {
        /// Size of the serialized collection.
        bytes: usize,
        /// Configured slot capacity.
        limit: usize,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Event Errors ===
    /// No event exists with the given id.
    #[error("no action with id {id}")]
    EventNotFound {
        /// The id that was looked up.
        id: EventId,
    },

    /// Submitted event fields are invalid.
    #[error("invalid action: {message}")]
    InvalidEvent {
        /// Description of the invalid field.
        message: String,
    },

    // === Image Errors ===
    /// An image could not be decoded.
    #[error("failed to decode image: {message}")]
    ImageDecode {
        /// Description of the decode failure.
        message: String,
    },

    /// An image could not be re-encoded.
    #[error("failed to encode image: {message}")]
    ImageEncode {
        /// Description of the encode failure.
        message: String,
    },

    /// An image file could not be read.
    #[error("failed to read image {path}: {source}")]
    ImageRead {
        /// Path to the image file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client used for probing could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for herolog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an invalid event error.
    #[must_use]
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }

    /// Create an image decode error.
    #[must_use]
    pub fn image_decode(message: impl Into<String>) -> Self {
        Self::ImageDecode {
            message: message.into(),
        }
    }

    /// Create an image encode error.
    #[must_use]
    pub fn image_encode(message: impl Into<String>) -> Self {
        Self::ImageEncode {
            message: message.into(),
        }
    }

    /// Check if this error means the target event does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EventNotFound { .. })
    }
}
