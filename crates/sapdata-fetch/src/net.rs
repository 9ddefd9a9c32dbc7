//! Transports: the byte sources the fetcher streams from.

mod protocol;

#[cfg(feature = "ftp")]
mod ftp;
#[cfg(feature = "http")]
mod http;

pub use protocol::{Protocol, Response, SchemeTransport, Transport};

#[cfg(feature = "ftp")]
pub use ftp::FtpTransport;
#[cfg(feature = "http")]
pub use http::HttpTransport;
