use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to copy '{}' to '{}': {source}", from.display(), to.display())]
    Copy {
        from:   PathBuf,
        to:     PathBuf,
        source: io::Error,
    },

    #[error("failed to move '{}' into place as '{}': {source}", from.display(), to.display())]
    Promote {
        from:   PathBuf,
        to:     PathBuf,
        source: io::Error,
    },

    #[error("failed to remove '{}': {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },

    #[error("path '{}' has no file name", .0.display())]
    NoFileName(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
