use std::path::PathBuf;
use std::time::Duration;

/// Bookkeeping for one in-flight transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadState {
    pub final_path:   PathBuf,
    pub temp_path:    PathBuf,
    /// Bytes present in `temp_path`; never decreases within a transfer.
    pub bytes_so_far: u64,
    pub total_size:   Option<u64>,
}

impl DownloadState {
    pub fn new(final_path: PathBuf, temp_path: PathBuf, bytes_so_far: u64) -> Self {
        Self {
            final_path,
            temp_path,
            bytes_so_far,
            total_size: None,
        }
    }

    pub fn advance(&mut self, n: usize) { self.bytes_so_far += n as u64; }

    /// Completion ratio, or the `0.0` placeholder when the total is unknown.
    pub fn ratio(&self) -> f64 {
        match self.total_size {
            Some(total) if total > 0 => self.bytes_so_far as f64 / total as f64,
            _ => 0.0,
        }
    }
}

/// How a fetch reached its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The final file already existed; nothing was transferred.
    AlreadyPresent,
    /// Downloaded from the first byte.
    Fresh,
    /// Continued from `offset` bytes already on disk.
    Resumed { offset: u64 },
    /// The resume was refused and the transfer restarted from scratch.
    Restarted,
}

/// Result of [`crate::Fetcher::fetch_with_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub path:              PathBuf,
    pub outcome:           FetchOutcome,
    /// Bytes received by this invocation.
    pub bytes_transferred: u64,
    pub total_size:        Option<u64>,
    pub elapsed:           Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_unknown_total_is_placeholder() {
        let mut state = DownloadState::new("a".into(), "a.part".into(), 0);
        state.advance(100);
        assert_eq!(state.ratio(), 0.0);
    }

    #[test]
    fn test_ratio_known_total() {
        let mut state = DownloadState::new("a".into(), "a.part".into(), 25);
        state.total_size = Some(100);
        assert_eq!(state.ratio(), 0.25);
        state.advance(75);
        assert_eq!(state.ratio(), 1.0);
    }
}
