use std::io::{self, Read};
use std::net::ToSocketAddrs;
use std::time::Duration;

use suppaftp::FtpStream;
use suppaftp::types::FileType;
use url::Url;

use super::protocol::{Response, Transport};
use crate::error::TransportError;

const DEFAULT_PORT: u16 = 21;
const ANONYMOUS: &str = "anonymous";

/// Blocking FTP transport backed by `suppaftp`.
///
/// Credentials come from the URL when present, otherwise the session is
/// anonymous. The timeout, when set, bounds connection establishment and
/// every read on the control and data channels.
pub struct FtpTransport {
    timeout: Option<Duration>,
}

impl FtpTransport {
    pub fn new(timeout: Option<Duration>) -> Self { Self { timeout } }

    /// Socket timeouts reject a zero duration; treat it as unbounded.
    fn socket_timeout(&self) -> Option<Duration> { self.timeout.filter(|t| !t.is_zero()) }

    fn connect(&self, url: &Url) -> Result<FtpStream, TransportError> {
        let host = url
            .host_str()
            .ok_or_else(|| TransportError::Unreachable(format!("no host in '{url}'")))?;
        let port = url.port().unwrap_or(DEFAULT_PORT);
        let unreachable = |e: &dyn std::fmt::Display| TransportError::Unreachable(e.to_string());

        let mut ftp = match self.socket_timeout() {
            Some(timeout) => {
                let addr = (host, port)
                    .to_socket_addrs()
                    .map_err(|e| unreachable(&e))?
                    .next()
                    .ok_or_else(|| TransportError::Unreachable(format!("cannot resolve '{host}'")))?;
                FtpStream::connect_timeout(addr, timeout).map_err(|e| unreachable(&e))?
            }
            None => FtpStream::connect((host, port)).map_err(|e| unreachable(&e))?,
        };

        let user = match url.username() {
            "" => ANONYMOUS,
            user => user,
        };
        let password = url.password().unwrap_or(ANONYMOUS);
        let control = ftp.get_ref();
        control
            .set_read_timeout(self.socket_timeout())
            .and_then(|()| control.set_write_timeout(self.socket_timeout()))
            .map_err(|e| unreachable(&e))?;

        ftp.login(user, password).map_err(|e| unreachable(&e))?;
        ftp.transfer_type(FileType::Binary)
            .map_err(|e| TransportError::Failed(e.to_string()))?;
        Ok(ftp)
    }
}

impl Transport for FtpTransport {
    fn probe(&self, url: &Url) -> Result<(), TransportError> {
        let path = remote_path(url)?;
        let mut ftp = self.connect(url)?;
        let found = ftp.size(&path);
        let _ = ftp.quit();
        found
            .map(|_| ())
            .map_err(|e| TransportError::Unreachable(e.to_string()))
    }

    fn open(&self, url: &Url, offset: u64) -> Result<Response, TransportError> {
        let path = remote_path(url)?;
        let mut ftp = self.connect(url)?;
        let size = ftp.size(&path).ok().map(|s| s as u64);

        if offset > 0 {
            let offset = usize::try_from(offset)
                .map_err(|e| TransportError::RangeRejected(e.to_string()))?;
            ftp.resume_transfer(offset)
                .map_err(|e| TransportError::RangeRejected(e.to_string()))?;
        }

        let data = ftp.retr_as_stream(&path).map_err(|e| {
            if offset > 0 {
                TransportError::RangeRejected(e.to_string())
            } else {
                TransportError::Failed(e.to_string())
            }
        })?;
        data.get_ref()
            .set_read_timeout(self.socket_timeout())
            .map_err(|e| TransportError::Failed(e.to_string()))?;

        let body = FtpBody {
            data: Some(Box::new(data)),
            ctrl: ftp,
        };
        Ok(Response::new(body, size.map(|s| s.saturating_sub(offset))))
    }
}

/// Percent-decoded path of `url`, as the server names the file.
fn remote_path(url: &Url) -> Result<String, TransportError> {
    urlencoding::decode(url.path())
        .map(|p| p.into_owned())
        .map_err(|e| TransportError::Failed(format!("path of '{url}' is not UTF-8: {e}")))
}

/// Data channel plus the control session that must acknowledge its end.
struct FtpBody {
    data: Option<Box<dyn Read + Send>>,
    ctrl: FtpStream,
}

impl Read for FtpBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(data) = self.data.as_mut() else {
            return Ok(0);
        };
        let n = data.read(buf)?;
        if n == 0
            && let Some(data) = self.data.take()
        {
            self.ctrl.finalize_retr_stream(data).map_err(io::Error::other)?;
            let _ = self.ctrl.quit();
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_path_is_decoded() {
        let url = Url::parse("ftp://ftp.example.org/pub/sample%20data/M31%20128.fits").unwrap();
        assert_eq!(remote_path(&url).unwrap(), "/pub/sample data/M31 128.fits");

        let plain = Url::parse("ftp://ftp.cea.fr/pub/unati/nsap/pysap/datasets/M31_128.fits").unwrap();
        assert_eq!(remote_path(&plain).unwrap(), plain.path());
    }

    #[test]
    fn test_zero_timeout_is_unbounded() {
        assert_eq!(FtpTransport::new(Some(Duration::ZERO)).socket_timeout(), None);
        let bounded = FtpTransport::new(Some(Duration::from_secs(5)));
        assert_eq!(bounded.socket_timeout(), Some(Duration::from_secs(5)));
    }
}
