//! Client I/O errors.

use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport task has stopped; nothing more can be sent.
    #[error("transport closed")]
    Closed,

    /// No transport is open.
    #[error("no transport open")]
    NotOpen,
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Server URL could not be parsed.
    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    /// Server URL is not `http` or `https`.
    #[error("unsupported server scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
}
