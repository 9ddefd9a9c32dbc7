use std::time::Duration;

/// Configuration for a single fetch.
///
/// # Examples
///
/// ```
/// use sapdata_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .overwrite(true)
///     .timeout(Some(Duration::from_secs(60)));
/// assert!(options.resume);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Continue from an existing `.part` file with a range request.
    ///
    /// Default: true
    pub resume: bool,

    /// Drop an existing final file and any previous resume point.
    ///
    /// Default: false
    pub overwrite: bool,

    /// Bound on connection and reads. `None` waits indefinitely.
    ///
    /// Default: None
    pub timeout: Option<Duration>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            resume:    true,
            overwrite: false,
            timeout:   None,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
