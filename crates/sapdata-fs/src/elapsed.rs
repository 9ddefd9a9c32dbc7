use std::time::Duration;

/// Render a duration as `"<m> minutes, <s.ss> seconds"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    let minutes = (secs / 60.0).floor();
    format!("{} minutes, {:.2} seconds", minutes as u64, secs - minutes * 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "0 minutes, 1.50 seconds");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2 minutes, 5.00 seconds");
    }
}
