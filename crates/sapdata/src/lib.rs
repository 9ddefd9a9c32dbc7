//! Named sample datasets, acquired once and verified on every use.
//!
//! # Architecture
//!
//! - [`catalog`] - the immutable name → source/digest/options table
//! - [`acquire`] - the [`Orchestrator`] that copies or downloads, verifies and loads
//! - [`loader`] - the [`Loader`] seam to format readers
//! - [`engine`] - traits describing the external transform engine
//! - [`config`] - [`Settings`] read from the user configuration file
//!
//! Transfers go through [`sapdata_fetch`], copies and atomic placement
//! through [`sapdata_fs`], digests through [`sapdata_verify`].
//!
//! # Example
//!
//! ```no_run
//! let dataset = sapdata::get_sample_data("mri-mask", "/tmp/sapdata")?;
//! assert_eq!(dataset.path.file_name().unwrap(), "mask_BrainPhantom512.nii.gz");
//! # Ok::<(), sapdata::Error>(())
//! ```

pub mod acquire;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod loader;

mod error;
mod options;

pub use acquire::{Orchestrator, Stage, Verification, get_sample_data};
pub use catalog::{Catalog, DatasetEntry, DatasetSpec};
pub use config::Settings;
pub use error::{Error, Result};
pub use loader::{LoadedDataset, Loader, PathLoader};
pub use options::{LoaderOptions, OptionValue};
