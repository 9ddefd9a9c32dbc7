use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::RANGE;
use url::Url;

use super::protocol::{Response, Transport};
use crate::error::TransportError;

/// Blocking HTTP(S) transport backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// `None` disables the timeout entirely; reqwest's blocking default of
    /// 30 seconds is not used.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("sapdata/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| TransportError::Failed(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn probe(&self, url: &Url) -> Result<(), TransportError> {
        let response = self
            .client
            .head(url.as_str())
            .send()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status();
        // Some servers refuse HEAD outright while serving GET fine.
        if status.is_success()
            || status == StatusCode::METHOD_NOT_ALLOWED
            || status == StatusCode::NOT_IMPLEMENTED
        {
            Ok(())
        } else {
            Err(TransportError::Unreachable(format!("HTTP {status}")))
        }
    }

    fn open(&self, url: &Url, offset: u64) -> Result<Response, TransportError> {
        let mut request = self.client.get(url.as_str());
        if offset > 0 {
            request = request.header(RANGE, format!("bytes={offset}-"));
        }

        let response = request
            .send()
            .map_err(|e| TransportError::Failed(e.to_string()))?;
        let status = response.status();

        if offset > 0 {
            // A 200 means the range was ignored and the full body follows.
            if status != StatusCode::PARTIAL_CONTENT {
                return Err(TransportError::RangeRejected(format!(
                    "HTTP {status} for bytes={offset}-"
                )));
            }
        } else if !status.is_success() {
            return Err(TransportError::Failed(format!("HTTP {status}")));
        }

        let content_length = response.content_length();
        Ok(Response::new(response, content_length))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::{Arc, Mutex};
    use std::thread;

    use tempfile::tempdir;

    use super::*;
    use crate::{FetchOutcome, Fetcher, NoopReporter};

    const DATA: &[u8] = b"SIMPLE  =                    T / ngc2997 sample frame";

    /// Serves one canned answer per connection and records request heads.
    fn serve(respond: impl Fn(&str) -> Vec<u8> + Send + 'static) -> (Url, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let head = read_head(&mut stream);
                log.lock().unwrap().push(head.clone());
                let _ = stream.write_all(&respond(&head));
            }
        });
        let url = Url::parse(&format!("http://{addr}/datasets/ngc2997.fits")).unwrap();
        (url, seen)
    }

    fn read_head(stream: &mut TcpStream) -> String {
        let mut head = Vec::new();
        let mut byte = [0u8; 1];
        while !head.ends_with(b"\r\n\r\n") {
            match stream.read(&mut byte) {
                Ok(1) => head.push(byte[0]),
                _ => break,
            }
        }
        String::from_utf8_lossy(&head).to_ascii_lowercase()
    }

    fn reply(status: &str, extra: &str, body: &[u8]) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\n{extra}Connection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        out.extend_from_slice(body);
        out
    }

    fn is_head(head: &str) -> bool { head.starts_with("head ") }

    fn range_start(head: &str) -> Option<usize> {
        head.split("\r\n")
            .find_map(|line| line.strip_prefix("range: bytes="))
            .and_then(|spec| spec.trim_end_matches('-').parse().ok())
    }

    fn transport() -> HttpTransport { HttpTransport::new(Some(Duration::from_secs(10))).unwrap() }

    fn read_body(response: Response) -> Vec<u8> {
        let mut out = Vec::new();
        let mut body = response.body;
        body.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_probe_accepts_head_refusals() {
        for status in ["405 Method Not Allowed", "501 Not Implemented"] {
            let (url, _) = serve(move |_| reply(status, "", b""));
            assert!(transport().probe(&url).is_ok(), "{status}");
        }

        let (url, _) = serve(|_| reply("404 Not Found", "", b""));
        assert!(matches!(transport().probe(&url), Err(TransportError::Unreachable(_))));
    }

    #[test]
    fn test_probe_connection_refused_is_unreachable() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let url = Url::parse(&format!("http://{addr}/a.npy")).unwrap();
        assert!(matches!(transport().probe(&url), Err(TransportError::Unreachable(_))));
    }

    #[test]
    fn test_ranged_get_accepts_partial_content() {
        let (url, seen) = serve(|head| match range_start(head) {
            Some(start) => reply(
                "206 Partial Content",
                &format!("Content-Range: bytes {start}-{}/{}\r\n", DATA.len() - 1, DATA.len()),
                &DATA[start..],
            ),
            None => reply("200 OK", "", DATA),
        });

        let response = transport().open(&url, 10).unwrap();

        assert_eq!(response.content_length, Some((DATA.len() - 10) as u64));
        assert_eq!(read_body(response), &DATA[10..]);
        assert!(seen.lock().unwrap()[0].contains("\r\nrange: bytes=10-\r\n"));
    }

    #[test]
    fn test_ranged_get_rejections() {
        let (url, _) = serve(|_| reply("200 OK", "", DATA));
        assert!(matches!(transport().open(&url, 10), Err(TransportError::RangeRejected(_))));

        let (url, _) = serve(|_| reply("416 Range Not Satisfiable", "", b""));
        assert!(matches!(transport().open(&url, 10), Err(TransportError::RangeRejected(_))));
    }

    #[test]
    fn test_fresh_get_requires_success() {
        let (url, seen) = serve(|_| reply("200 OK", "", DATA));
        let response = transport().open(&url, 0).unwrap();
        assert_eq!(read_body(response), DATA);
        assert!(!seen.lock().unwrap()[0].contains("range:"));

        let (url, _) = serve(|_| reply("500 Internal Server Error", "", b"boom"));
        assert!(matches!(transport().open(&url, 0), Err(TransportError::Failed(_))));
    }

    #[test]
    fn test_fetcher_restarts_once_when_range_is_ignored() {
        let (url, seen) = serve(|head| {
            if is_head(head) {
                reply("200 OK", "", b"")
            } else {
                reply("200 OK", "", DATA)
            }
        });
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("ngc2997.fits.part"), &DATA[..7]).unwrap();

        let report = Fetcher::new(transport())
            .fetch_with_report(url.as_str(), dir.path(), &mut NoopReporter)
            .unwrap();

        assert_eq!(report.outcome, FetchOutcome::Restarted);
        assert_eq!(std::fs::read(&report.path).unwrap(), DATA);
        let gets: Vec<String> = seen
            .lock()
            .unwrap()
            .iter()
            .filter(|head| head.starts_with("get "))
            .cloned()
            .collect();
        assert_eq!(gets.len(), 2);
        assert!(gets[0].contains("range: bytes=7-"));
        assert!(!gets[1].contains("range:"));
    }
}
