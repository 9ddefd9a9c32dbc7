//! Copying locally available resources into the managed data directory.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::{Error, Result, ensure_dir, format_elapsed, remove_if_exists};

#[derive(Clone, Copy, Debug, Default)]
pub struct CopyOptions {
    /// Replace an existing destination instead of returning it.
    pub overwrite: bool,
}

impl CopyOptions {
    pub fn new() -> Self { Self::default() }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Copy `src` into `dest_dir`, keeping its file name, permissions and timestamps.
///
/// An existing destination is returned untouched unless `overwrite` is set.
pub fn copy_local(src: &Path, dest_dir: &Path, options: CopyOptions) -> Result<PathBuf> {
    ensure_dir(dest_dir)?;

    let name = src.file_name().ok_or_else(|| Error::NoFileName(src.to_path_buf()))?;
    let dest = dest_dir.join(name);

    if dest.exists() {
        if !options.overwrite {
            tracing::debug!(path = %dest.display(), "destination already present, skipping copy");
            return Ok(dest);
        }
        if is_same_file(src, &dest) {
            tracing::debug!(path = %dest.display(), "source already in place, skipping copy");
            return Ok(dest);
        }
        remove_if_exists(&dest)?;
    }

    let started = Instant::now();
    tracing::info!(from = %src.display(), "copying data");

    let copy_err = |source| Error::Copy {
        from: src.to_path_buf(),
        to: dest.clone(),
        source,
    };

    // fs::copy carries permissions over; timestamps are restored by hand.
    fs::copy(src, &dest).map_err(copy_err)?;
    let meta = fs::metadata(src).map_err(|source| Error::Read {
        path: src.to_path_buf(),
        source,
    })?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Err(e) = restore_times(&dest, times) {
        // A copy without its timestamps must not satisfy the next short-circuit.
        let _ = fs::remove_file(&dest);
        return Err(copy_err(e));
    }

    tracing::info!(
        path = %dest.display(),
        "copy was done in {}",
        format_elapsed(started.elapsed())
    );
    Ok(dest)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Set `times` on `dest` without a write handle, which a read-only copy refuses.
fn restore_times(dest: &Path, times: FileTimes) -> io::Result<()> {
    #[cfg(windows)]
    let file = {
        use std::os::windows::fs::OpenOptionsExt;
        const FILE_WRITE_ATTRIBUTES: u32 = 0x100;
        File::options().access_mode(FILE_WRITE_ATTRIBUTES).open(dest)?
    };
    #[cfg(not(windows))]
    let file = File::open(dest)?;
    file.set_times(times)
}
