use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

use super::Reporter;

const PB_STYLE: &str =
    "{prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {percent:>3}% {msg}";

const PB_CHARS: &str = "█▓▒░  ";

/// Resolution of the bar; ratios map onto `0..=SCALE`.
const SCALE: u64 = 1000;

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .ok()
        .map(|style| style.progress_chars(PB_CHARS))
});

/// Terminal progress bar backed by `indicatif`, for interactive use.
pub struct TrackerReporter {
    pb:       ProgressBar,
    prefixed: bool,
}

impl TrackerReporter {
    pub fn new() -> Self {
        let pb = ProgressBar::new(SCALE);
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        Self {
            pb,
            prefixed: false,
        }
    }

    /// Hidden bar, for tests and non-interactive output.
    pub fn hidden() -> Self {
        Self {
            pb:       ProgressBar::hidden(),
            prefixed: false,
        }
    }

    pub fn position(&self) -> u64 { self.pb.position() }
}

impl Default for TrackerReporter {
    fn default() -> Self { Self::new() }
}

impl Reporter for TrackerReporter {
    fn report(&mut self, ratio: f64, label: &str) {
        if !self.prefixed {
            self.pb.set_prefix(label.to_string());
            self.prefixed = true;
        }
        let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
        self.pb.set_position((ratio * SCALE as f64) as u64);
    }

    fn finish(&mut self) { self.pb.finish(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_clamps_ratio() {
        let mut tracker = TrackerReporter::hidden();
        tracker.report(0.5, "file.npy");
        assert_eq!(tracker.position(), 500);
        tracker.report(3.0, "file.npy");
        assert_eq!(tracker.position(), SCALE);
    }
}
