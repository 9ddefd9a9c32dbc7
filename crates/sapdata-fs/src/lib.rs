//! Filesystem primitives for the acquisition pipeline.
//!
//! Staging files live next to their final name (`<name>.part`) and are
//! promoted with a single rename, so a reader never observes a half-written
//! dataset under its final name.

mod copy;
mod elapsed;
mod error;
mod promote;

pub mod dir;

pub use copy::{CopyOptions, copy_local};
pub use elapsed::format_elapsed;
pub use error::{Error, Result};
pub use promote::{PART_SUFFIX, ensure_dir, part_path, promote, remove_if_exists};
