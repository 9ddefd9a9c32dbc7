//! Error types for sapdata-fetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported URL scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("the resource '{url}' is not available: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("error while downloading '{url}', download aborted: {source}")]
    TransferFailed {
        url:    String,
        #[source]
        source: BoxError,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Fs(#[from] sapdata_fs::Error),
}

/// Failure reported by a [`crate::Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The source could not be contacted, or does not exist.
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// The source refused to continue from a byte offset.
    #[error("range request rejected: {0}")]
    RangeRejected(String),

    /// The scheme has no transport behind it.
    #[error("unsupported scheme '{0}'")]
    Unsupported(String),

    #[error("{0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
