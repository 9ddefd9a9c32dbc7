//! Progress display driven synchronously from the transfer loop.

use std::io::{self, Stdout, Write};

mod tracker;

pub use tracker::TrackerReporter;

pub const DEFAULT_BAR_WIDTH: usize = 20;
pub const DEFAULT_LABEL_WIDTH: usize = 40;

/// Sink for transfer progress.
///
/// `ratio` is `bytes_so_far / total_size`, or `0.0` when the total is
/// unknown. Values above 1 happen when a server under-reports its size and
/// must be tolerated.
pub trait Reporter {
    fn report(&mut self, ratio: f64, label: &str);

    /// Called once after the last chunk of a completed transfer.
    fn finish(&mut self) {}
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, ratio: f64, label: &str) { (**self).report(ratio, label) }

    fn finish(&mut self) { (**self).finish() }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, ratio: f64, label: &str) { (**self).report(ratio, label) }

    fn finish(&mut self) { (**self).finish() }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&mut self, _ratio: f64, _label: &str) {}
}

/// Render one frame: `\r[====      ] 42% label`.
///
/// The bar is clamped to `bar_width`; the percentage is not, so an
/// under-reported size stays visible.
pub fn render_bar(ratio: f64, label: &str, bar_width: usize, label_width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.max(0.0) } else { 0.0 };
    let block = ((ratio.min(1.0) * bar_width as f64).round_ties_even() as usize).min(bar_width);
    let percent = (ratio * 100.0) as u64;
    format!(
        "\r[{}{}] {}% {:<label_width$}",
        "=".repeat(block),
        " ".repeat(bar_width - block),
        percent,
        label,
    )
}

/// Carriage-return progress bar, flushed after every frame.
pub struct BarReporter<W: Write = Stdout> {
    out:         W,
    bar_width:   usize,
    label_width: usize,
    drawn:       bool,
}

impl BarReporter<Stdout> {
    pub fn stdout() -> Self { Self::new(io::stdout()) }
}

impl Default for BarReporter<Stdout> {
    fn default() -> Self { Self::stdout() }
}

impl<W: Write> BarReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bar_width: DEFAULT_BAR_WIDTH,
            label_width: DEFAULT_LABEL_WIDTH,
            drawn: false,
        }
    }

    #[must_use]
    pub fn bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width;
        self
    }

    #[must_use]
    pub fn label_width(mut self, label_width: usize) -> Self {
        self.label_width = label_width;
        self
    }

    pub fn into_inner(self) -> W { self.out }
}

impl<W: Write> Reporter for BarReporter<W> {
    fn report(&mut self, ratio: f64, label: &str) {
        let frame = render_bar(ratio, label, self.bar_width, self.label_width);
        // Display only; a closed stdout must not abort the download.
        let _ = self.out.write_all(frame.as_bytes());
        let _ = self.out.flush();
        self.drawn = true;
    }

    fn finish(&mut self) {
        if std::mem::take(&mut self.drawn) {
            let _ = self.out.write_all(b"\n");
            let _ = self.out.flush();
        }
    }
}
