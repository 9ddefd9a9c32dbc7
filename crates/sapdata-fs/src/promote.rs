use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Suffix marking an in-progress or interrupted download.
pub const PART_SUFFIX: &str = ".part";

/// `<final>.part`, the staging file next to `final_path`.
pub fn part_path(final_path: &Path) -> PathBuf {
    let mut name = OsString::from(final_path.as_os_str());
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// Create `dir` and its parents if absent.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Remove `path` if it exists. Returns whether a file was removed.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(Error::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Atomically move a finished staging file to its final name.
///
/// Both paths must live in the same directory, which is how [`part_path`]
/// derives them, so the rename never crosses a filesystem boundary.
pub fn promote(staging: &Path, final_path: &Path) -> Result<()> {
    fs::rename(staging, final_path).map_err(|source| Error::Promote {
        from: staging.to_path_buf(),
        to: final_path.to_path_buf(),
        source,
    })
}
