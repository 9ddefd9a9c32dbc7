//! Protocol abstraction layer.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use url::Url;

use crate::error::TransportError;

/// Protocol identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// HTTP/HTTPS protocol
    Http,
    /// FTP protocol
    Ftp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Ftp => "ftp",
        }
    }

    /// Parse a protocol from a URL scheme.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_ascii_lowercase().as_str() {
            "http" | "https" => Some(Protocol::Http),
            "ftp" => Some(Protocol::Ftp),
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// An opened transfer.
pub struct Response {
    /// Remaining bytes of the resource, starting at the requested offset.
    pub body:           Box<dyn Read + Send>,
    /// Length of `body` when the source reported one.
    pub content_length: Option<u64>,
}

impl Response {
    pub fn new(body: impl Read + Send + 'static, content_length: Option<u64>) -> Self {
        Self {
            body: Box::new(body),
            content_length,
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("body", &"{ ... }")
            .field("content_length", &self.content_length)
            .finish()
    }
}

/// Blocking byte source behind the fetcher.
///
/// # Implementations
///
/// - [`crate::HttpTransport`]: HTTP and HTTPS through `reqwest`
/// - [`crate::FtpTransport`]: anonymous FTP through `suppaftp`
/// - [`SchemeTransport`]: routes to one of the above by URL scheme
pub trait Transport {
    /// Cheap connection check performed before any file is created.
    fn probe(&self, url: &Url) -> Result<(), TransportError>;

    /// Open the resource starting at byte `offset`.
    ///
    /// A non-zero offset asks for the remainder only. Sources that cannot
    /// honour it must answer [`TransportError::RangeRejected`] rather than
    /// silently sending the whole resource.
    fn open(&self, url: &Url, offset: u64) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn probe(&self, url: &Url) -> Result<(), TransportError> { (**self).probe(url) }

    fn open(&self, url: &Url, offset: u64) -> Result<Response, TransportError> {
        (**self).open(url, offset)
    }
}

/// Dispatches to the transport registered for the URL's scheme.
pub struct SchemeTransport {
    #[cfg(feature = "http")]
    http: crate::HttpTransport,
    #[cfg(feature = "ftp")]
    ftp:  crate::FtpTransport,
}

impl SchemeTransport {
    /// Build every compiled-in transport. `None` disables timeouts.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        Ok(Self {
            #[cfg(feature = "http")]
            http: crate::HttpTransport::new(timeout)?,
            #[cfg(feature = "ftp")]
            ftp: crate::FtpTransport::new(timeout),
        })
    }

    fn route(&self, url: &Url) -> Result<&dyn Transport, TransportError> {
        match Protocol::from_scheme(url.scheme()) {
            #[cfg(feature = "http")]
            Some(Protocol::Http) => Ok(&self.http),
            #[cfg(feature = "ftp")]
            Some(Protocol::Ftp) => Ok(&self.ftp),
            #[allow(unreachable_patterns)]
            _ => Err(TransportError::Unsupported(url.scheme().to_string())),
        }
    }
}

impl Transport for SchemeTransport {
    fn probe(&self, url: &Url) -> Result<(), TransportError> { self.route(url)?.probe(url) }

    fn open(&self, url: &Url, offset: u64) -> Result<Response, TransportError> {
        self.route(url)?.open(url, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_from_scheme() {
        assert_eq!(Protocol::from_scheme("http"), Some(Protocol::Http));
        assert_eq!(Protocol::from_scheme("HTTPS"), Some(Protocol::Http));
        assert_eq!(Protocol::from_scheme("ftp"), Some(Protocol::Ftp));
        assert_eq!(Protocol::from_scheme("s3"), None);
    }

    #[test]
    fn test_unknown_scheme_is_unsupported() {
        let transport = SchemeTransport::new(None).unwrap();
        let url = Url::parse("gopher://example.com/file.npy").unwrap();
        assert!(matches!(transport.probe(&url), Err(TransportError::Unsupported(s)) if s == "gopher"));
    }
}
