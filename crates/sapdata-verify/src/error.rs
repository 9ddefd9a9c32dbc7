use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("checksum mismatch for '{}': expected {expected}, got {actual}", path.display())]
    Mismatch {
        path:     PathBuf,
        expected: String,
        actual:   String,
    },

    #[error("invalid checksum '{0}'")]
    InvalidChecksum(String),

    #[error("unsupported hash algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, VerifyError>;
