//! Content verification primitives for acquired sample datasets.
//!
//! Digests are computed incrementally so arbitrarily large files are hashed
//! in bounded memory. The algorithm is selected at runtime from the expected
//! [`Checksum`], which keeps catalog entries free to mix MD5 and SHA-256.
//!
//! # Example
//!
//! ```no_run
//! use sapdata_verify::{Checksum, verify_file};
//!
//! let expected: Checksum = "md5:5eb63bbbe01eeed093cb22bb8f5acdc3".parse()?;
//! verify_file("/tmp/hello.txt", &expected)?;
//! # Ok::<(), sapdata_verify::VerifyError>(())
//! ```

pub use self::checksum::{Checksum, HashAlgorithm};
pub use self::error::{Result, VerifyError};
pub use self::file::{CHUNK_SIZE, digest_of, verify_file};
pub use self::hasher::{AnyHasher, DigestHasher, Hasher};
pub use self::reader::VerifiedReader;

#[cfg(feature = "md5")]
pub use self::hasher::Md5Hasher;

#[cfg(feature = "sha256")]
pub use self::hasher::Sha256Hasher;

mod checksum;
mod error;
mod file;
mod hasher;
mod reader;
