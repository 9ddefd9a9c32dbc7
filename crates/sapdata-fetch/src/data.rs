//! Immutable configuration and transient transfer state.

mod options;
mod state;

pub use options::FetchOptions;
pub use state::{DownloadState, FetchOutcome, FetchReport};
