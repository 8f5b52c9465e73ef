//! Error types.

use thiserror::Error;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a byte source while reading target memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SourceError {
    message: String,
}

impl SourceError {
    /// Create a source error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message supplied by the source.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors produced by the memory line tracker and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The source returned no content at all.
    #[error("unable to retrieve content: the byte source returned nothing")]
    ByteSourceUnavailable,

    /// The source failed while reading.
    #[error("unable to retrieve content: {0}")]
    ByteSourceThrew(#[from] SourceError),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No rendering is registered under the requested id.
    #[error("unknown rendering: {0}")]
    UnknownRendering(String),

    /// A rendering descriptor names a kind with no factory.
    #[error("no factory registered for rendering kind: {0}")]
    UnknownRenderingKind(String),
}

impl Error {
    /// Whether the error came from reading target memory.
    pub const fn is_source_error(&self) -> bool {
        matches!(self, Self::ByteSourceUnavailable | Self::ByteSourceThrew(_))
    }
}
