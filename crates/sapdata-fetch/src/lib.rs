//! Resumable downloading with staged files and atomic placement.
//!
//! # Architecture
//!
//! - [`data`] - options and transfer bookkeeping
//! - [`net`] - the [`Transport`] seam with HTTP and FTP implementations
//! - [`progress`] - [`Reporter`] sinks driven from the transfer loop
//! - [`fetch`] - the [`Fetcher`] state machine
//!
//! # Key Features
//!
//! - **Staged**: bytes land in `<name>.part` and are renamed into place only
//!   after the last chunk, so a final name always holds a complete file
//! - **Resumable**: an interrupted `.part` file is continued with a range
//!   request; a refused range falls back once to a fresh transfer
//! - **Blocking**: one thread, no background work, progress reported inline

pub mod data;
pub mod fetch;
pub mod net;
pub mod progress;

mod error;

pub use data::{DownloadState, FetchOptions, FetchOutcome, FetchReport};
pub use error::{BoxError, FetchError, Result, TransportError};
pub use fetch::{CHUNK_SIZE, Fetcher, file_name_of};
pub use net::{Protocol, Response, SchemeTransport, Transport};
pub use progress::{BarReporter, NoopReporter, Reporter, TrackerReporter, render_bar};

#[cfg(feature = "ftp")]
pub use net::FtpTransport;
#[cfg(feature = "http")]
pub use net::HttpTransport;
