//! Whole-file digests computed in bounded memory.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{Checksum, HashAlgorithm, Result, VerifiedReader, VerifyError};

/// Read size used when hashing files.
pub const CHUNK_SIZE: usize = 8192;

/// Compute the hex digest of the file at `path`, reading `CHUNK_SIZE` bytes at a time.
pub fn digest_of(path: impl AsRef<Path>, algorithm: HashAlgorithm) -> Result<String> {
    let path = path.as_ref();
    let read_err = |source| VerifyError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let mut reader = VerifiedReader::new(file, algorithm.hasher()?);
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).map_err(read_err)?;
        if n == 0 {
            break;
        }
    }
    Ok(reader.finish())
}

/// Check `path` against `expected`. Returns the computed digest on success.
pub fn verify_file(path: impl AsRef<Path>, expected: &Checksum) -> Result<String> {
    let path = path.as_ref();
    let actual = digest_of(path, expected.algorithm())?;
    if expected.matches(&actual) {
        Ok(actual)
    } else {
        Err(VerifyError::Mismatch {
            path: path.to_path_buf(),
            expected: expected.hex().to_string(),
            actual,
        })
    }
}
