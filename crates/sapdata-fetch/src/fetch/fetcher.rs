use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use sapdata_fs::{ensure_dir, format_elapsed, part_path, promote, remove_if_exists};
use url::Url;

use crate::data::{DownloadState, FetchOptions, FetchOutcome, FetchReport};
use crate::error::{FetchError, Result, TransportError};
use crate::net::Transport;
use crate::progress::Reporter;

/// Read size of the transfer loop.
pub const CHUNK_SIZE: usize = 8192;

/// Where the next transfer attempt starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Resume { offset: u64 },
    Fresh,
}

/// Why a single attempt stopped.
enum AttemptError {
    RangeRejected(String),
    Fatal(FetchError),
}

impl From<FetchError> for AttemptError {
    fn from(e: FetchError) -> Self { AttemptError::Fatal(e) }
}

/// Downloads a URL into a directory through a `.part` staging file.
pub struct Fetcher<T: Transport> {
    transport: T,
    options:   FetchOptions,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            options: FetchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FetchOptions { &self.options }

    pub fn transport(&self) -> &T { &self.transport }

    /// Fetch `url` into `dest_dir` and return the final path.
    pub fn fetch(&self, url: &str, dest_dir: &Path, reporter: &mut dyn Reporter) -> Result<PathBuf> {
        self.fetch_with_report(url, dest_dir, reporter)
            .map(|report| report.path)
    }

    /// Fetch `url` into `dest_dir`, describing what happened.
    ///
    /// An existing final file is returned without touching the network unless
    /// `overwrite` is set. A transfer that fails mid-stream leaves its `.part`
    /// file behind so the next call can resume it.
    pub fn fetch_with_report(
        &self,
        url: &str,
        dest_dir: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<FetchReport> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url:    url.to_string(),
            reason: e.to_string(),
        })?;
        let name = file_name_of(&parsed)?;

        ensure_dir(dest_dir)?;
        let final_path = dest_dir.join(&name);
        let temp_path = part_path(&final_path);

        if final_path.exists() {
            if !self.options.overwrite {
                tracing::debug!(path = %final_path.display(), "already downloaded");
                return Ok(FetchReport {
                    path:              final_path,
                    outcome:           FetchOutcome::AlreadyPresent,
                    bytes_transferred: 0,
                    total_size:        None,
                    elapsed:           Default::default(),
                });
            }
            remove_if_exists(&final_path)?;
        }
        if self.options.overwrite && remove_if_exists(&temp_path)? {
            tracing::debug!(path = %temp_path.display(), "dropped previous resume point");
        }

        let started = Instant::now();

        self.transport.probe(&parsed).map_err(|e| match e {
            TransportError::Unsupported(scheme) => FetchError::UnsupportedScheme {
                url: url.to_string(),
                scheme,
            },
            other => FetchError::Unreachable {
                url:    url.to_string(),
                reason: other.to_string(),
            },
        })?;

        tracing::info!(%url, "downloading data");

        let mut attempt = match fs::metadata(&temp_path) {
            Ok(meta) if self.options.resume => Attempt::Resume { offset: meta.len() },
            _ => Attempt::Fresh,
        };
        let first = attempt;

        let state = loop {
            match self.transfer(&parsed, &name, &final_path, &temp_path, attempt, reporter) {
                Ok(state) => break state,
                Err(AttemptError::RangeRejected(reason)) if matches!(attempt, Attempt::Resume { .. }) => {
                    tracing::warn!(%url, %reason, "resume refused, restarting from scratch");
                    attempt = Attempt::Fresh;
                }
                Err(AttemptError::RangeRejected(reason)) => {
                    return Err(FetchError::TransferFailed {
                        url:    url.to_string(),
                        source: reason.into(),
                    });
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
            }
        };

        let (outcome, offset) = match (first, attempt) {
            (Attempt::Resume { offset }, Attempt::Resume { .. }) => (FetchOutcome::Resumed { offset }, offset),
            (Attempt::Resume { .. }, Attempt::Fresh) => (FetchOutcome::Restarted, 0),
            _ => (FetchOutcome::Fresh, 0),
        };

        promote(&temp_path, &final_path)?;

        let elapsed = started.elapsed();
        tracing::info!(
            path = %final_path.display(),
            bytes = state.bytes_so_far,
            "download was done in {}",
            format_elapsed(elapsed)
        );

        Ok(FetchReport {
            path: final_path,
            outcome,
            bytes_transferred: state.bytes_so_far - offset,
            total_size: state.total_size,
            elapsed,
        })
    }

    /// One pass of the transfer loop into `temp_path`.
    ///
    /// The staging handle is owned by this frame, so it is closed on every
    /// exit path before the caller promotes or abandons the file.
    fn transfer(
        &self,
        url: &Url,
        label: &str,
        final_path: &Path,
        temp_path: &Path,
        attempt: Attempt,
        reporter: &mut dyn Reporter,
    ) -> std::result::Result<DownloadState, AttemptError> {
        let offset = match attempt {
            Attempt::Resume { offset } => offset,
            Attempt::Fresh => 0,
        };

        let response = match self.transport.open(url, offset) {
            Ok(response) => response,
            Err(TransportError::RangeRejected(reason)) => {
                return Err(AttemptError::RangeRejected(reason));
            }
            Err(e) => {
                return Err(FetchError::TransferFailed {
                    url:    url.to_string(),
                    source: e.into(),
                }
                .into());
            }
        };

        let io_err = |source| FetchError::Io {
            path: temp_path.to_path_buf(),
            source,
        };
        let mut file = match attempt {
            Attempt::Resume { .. } => OpenOptions::new().append(true).open(temp_path),
            Attempt::Fresh => File::create(temp_path),
        }
        .map_err(io_err)?;

        let mut state = DownloadState::new(final_path.to_path_buf(), temp_path.to_path_buf(), offset);
        state.total_size = response.content_length.map(|len| len + offset);
        if state.total_size.is_none() {
            tracing::debug!(%url, "total size could not be determined");
        } else {
            tracing::debug!(%url, offset, total = ?state.total_size, "transfer started");
        }

        let mut body = response.body;
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = match body.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(FetchError::TransferFailed {
                        url:    url.to_string(),
                        source: e.into(),
                    }
                    .into());
                }
            };
            file.write_all(&buf[..n]).map_err(io_err)?;
            state.advance(n);
            reporter.report(state.ratio(), label);
        }
        reporter.finish();

        file.flush().map_err(io_err)?;
        drop(file);
        Ok(state)
    }
}

/// Last path segment of `url`, percent-decoded, used as the local file name.
pub fn file_name_of(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|segment| urlencoding::decode(segment).ok())
        .filter(|name| {
            !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
        })
        .map(|name| name.into_owned())
        .ok_or_else(|| FetchError::InvalidUrl {
            url:    url.to_string(),
            reason: "no file name in path".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_of() {
        let url = Url::parse("ftp://ftp.cea.fr/pub/unati/nsap/pysap/datasets/M31_128.fits").unwrap();
        assert_eq!(file_name_of(&url).unwrap(), "M31_128.fits");
    }

    #[test]
    fn test_file_name_of_rejects_directories() {
        let url = Url::parse("https://example.com/datasets/").unwrap();
        assert!(matches!(file_name_of(&url), Err(FetchError::InvalidUrl { .. })));
        let url = Url::parse("https://example.com").unwrap();
        assert!(matches!(file_name_of(&url), Err(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn test_file_name_of_decodes_escapes() {
        let url = Url::parse("https://example.com/data/M31%20128.fits").unwrap();
        assert_eq!(file_name_of(&url).unwrap(), "M31 128.fits");

        let url = Url::parse("https://example.com/data/..%2Fescape.npy").unwrap();
        assert!(matches!(file_name_of(&url), Err(FetchError::InvalidUrl { .. })));
    }
}
