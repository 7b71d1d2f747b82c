//! Error types for the reform pipeline.
//!
//! Errors are organized by concern: configuration and registry errors are
//! fatal at startup, while per-filter and per-blob errors are recorded into
//! batch reports and never abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for reform operations.
#[derive(Error, Debug)]
pub enum ReformError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Filter registry errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Filter processing errors
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Blob store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Filter registry errors. All of these are configuration mistakes and
/// surface immediately at startup.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A filter with the same name already exists in the namespace
    #[error("Filter '{name}' already registered in namespace '{namespace}'")]
    AlreadyRegistered { namespace: String, name: String },

    /// The namespace has no registered filters
    #[error("No filters registered for namespace '{0}'")]
    NotRegistered(String),

    /// The value is not a valid filter
    #[error("Not a registerable filter: {0}")]
    Unregisterable(String),

    /// Unregistration is disabled by design
    #[error("Filter unregistration is not supported")]
    UnregisterUnsupported,
}

/// Errors raised while a filter decodes, transforms, or encodes image bytes.
#[derive(Error, Debug)]
pub enum FilterError {
    /// A transform was asked for a degenerate target size. Caller contract
    /// violation, not a retryable condition.
    #[error("Invalid target dimensions {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Image decoding failed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Image encoding failed
    #[error("Encode error: {0}")]
    Encode(String),
}

/// Blob store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The source blob could not be opened for reading
    #[error("Source unavailable: {path}: {message}")]
    SourceUnavailable { path: PathBuf, message: String },

    /// The path escapes the store root or contains invalid sequences
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Underlying filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for reform results.
pub type Result<T> = std::result::Result<T, ReformError>;

/// Convenience type alias for filter-specific results.
pub type FilterResult<T> = std::result::Result<T, FilterError>;
