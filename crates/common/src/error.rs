//! Error types for the common crate
//!
//! This module defines the error taxonomy shared across the model
//! repository sidecar: repository failures, upload-payload failures,
//! and upstream inference-server failures.

use thiserror::Error;

/// Result type for sidecar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for sidecar operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Uploaded payload is not a well-formed zip archive
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// Model configuration file does not exist
    #[error("Model config file not found for '{0}'")]
    ConfigNotFound(String),

    /// Configuration file has no recognizable version directive
    #[error("Version info not found in the config file for '{0}'")]
    VersionNotFound(String),

    /// Pinned version directory has no metadata sidecar
    #[error("Metadata not found for '{0}'")]
    MetaNotFound(String),

    /// Semantic label is already mapped to an existing version
    #[error("Version '{0}' already exists")]
    VersionAlreadyExists(String),

    /// Semantic label does not resolve to any version directory
    #[error("Semantic version '{0}' not found")]
    SemanticVersionNotFound(String),

    /// Inference server management API returned a non-success status
    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Invalid argument error
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if the error maps to a not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound(_)
                | Error::VersionNotFound(_)
                | Error::MetaNotFound(_)
                | Error::SemanticVersionNotFound(_)
        )
    }

    /// Returns true if the error is caused by the client's request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidArchive(_) | Error::VersionAlreadyExists(_) | Error::InvalidArgument(_)
        )
    }

    /// Returns true if the error originates from the inference server
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }
}
