//! Error types for sapdata.

use std::path::PathBuf;

use sapdata_fetch::{BoxError, FetchError, TransportError};
use sapdata_verify::VerifyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no '{name}' sample data available - allowed sample data are {}", available.join(", "))]
    NotFound { name: String, available: Vec<String> },

    #[error("file '{}' checksum verification has failed: expected {expected}, got {actual}", path.display())]
    IntegrityMismatch {
        path:     PathBuf,
        expected: String,
        actual:   String,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to set up transport: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Fs(#[from] sapdata_fs::Error),

    #[error(transparent)]
    Verify(VerifyError),

    #[error("failed to load '{}': {source}", path.display())]
    Load { path: PathBuf, source: BoxError },

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("invalid configuration{}: {reason}", path.as_ref().map(|p| format!(" in '{}'", p.display())).unwrap_or_default())]
    Config {
        path:   Option<PathBuf>,
        reason: String,
    },
}

impl From<VerifyError> for Error {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::Mismatch {
                path,
                expected,
                actual,
            } => Error::IntegrityMismatch {
                path,
                expected,
                actual,
            },
            other => Error::Verify(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_every_name() {
        let err = Error::NotFound {
            name:      "astro-moon".into(),
            available: vec!["astro-fits".into(), "mri-mask".into()],
        };
        assert_eq!(
            err.to_string(),
            "no 'astro-moon' sample data available - allowed sample data are astro-fits, mri-mask"
        );
    }

    #[test]
    fn test_verify_mismatch_becomes_integrity_error() {
        let err: Error = VerifyError::Mismatch {
            path:     "/data/a.npy".into(),
            expected: "aa".into(),
            actual:   "bb".into(),
        }
        .into();
        assert!(matches!(err, Error::IntegrityMismatch { ref expected, .. } if expected == "aa"));

        let err: Error = VerifyError::InvalidChecksum("xyz".into()).into();
        assert!(matches!(err, Error::Verify(_)));
    }

    #[test]
    fn test_config_error_names_file() {
        let err = Error::Config {
            path:   Some("/etc/sapdata.toml".into()),
            reason: "bad".into(),
        };
        assert_eq!(err.to_string(), "invalid configuration in '/etc/sapdata.toml': bad");
    }
}
