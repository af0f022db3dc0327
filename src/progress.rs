//! Download progress display
//!
//! One [`DownloadProgress`] lives for exactly one download. It only draws when
//! stdout is a terminal, and redraws at most once per update period no matter
//! how small the chunks coming off the network are.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::{Duration, Instant};

pub const UPDATE_PERIOD: Duration = Duration::from_secs(1);

pub struct DownloadProgress {
    bar: ProgressBar,
    transferred: u64,
    last_update: Option<Instant>,
    period: Duration,
    updates: usize,
}

impl DownloadProgress {
    /// Progress for a download of `total` bytes (if the server said),
    /// drawn on stdout only when it is a terminal
    pub fn for_stdout(total: Option<u64>) -> Self {
        let visible = std::io::stdout().is_terminal();
        Self::new(total, visible, UPDATE_PERIOD)
    }

    pub fn new(total: Option<u64>, visible: bool, period: Duration) -> Self {
        let bar = if visible {
            ProgressBar::with_draw_target(total, ProgressDrawTarget::stdout())
        } else {
            ProgressBar::hidden()
        };

        let template = if total.is_some() {
            "downloading: {decimal_bytes} of {decimal_total_bytes}"
        } else {
            "downloading: {decimal_bytes} of ???"
        };
        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            bar.set_style(style);
        }

        Self {
            bar,
            transferred: 0,
            last_update: None,
            period,
            updates: 0,
        }
    }

    /// Record `n` more bytes received
    pub fn advance(&mut self, n: u64) {
        self.transferred += n;
        let now = Instant::now();
        let due = self
            .last_update
            .map_or(true, |last| now.duration_since(last) >= self.period);
        if due {
            self.last_update = Some(now);
            self.updates += 1;
            self.bar.set_position(self.transferred);
        }
    }

    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Number of times the display was refreshed
    #[cfg(test)]
    fn updates(&self) -> usize {
        self.updates
    }

    /// Erase the progress line
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for DownloadProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_are_rate_limited() {
        let mut progress = DownloadProgress::new(Some(300), false, Duration::from_secs(3600));
        progress.advance(100);
        progress.advance(100);
        progress.advance(100);
        assert_eq!(progress.transferred(), 300);
        assert_eq!(progress.updates(), 1, "only the first chunk is drawn");
    }

    #[test]
    fn test_zero_period_draws_every_chunk() {
        let mut progress = DownloadProgress::new(None, false, Duration::ZERO);
        for _ in 0..4 {
            progress.advance(10);
        }
        assert_eq!(progress.updates(), 4);
        assert_eq!(progress.transferred(), 40);
        progress.finish();
    }

    #[test]
    fn test_fresh_progress_has_no_updates() {
        let progress = DownloadProgress::new(Some(1), false, UPDATE_PERIOD);
        assert_eq!(progress.updates(), 0);
        assert_eq!(progress.transferred(), 0);
    }
}
