//! Terminal progress display for a running search

use crate::fitting::assignment::FitResult;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

static BOUNDED_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:30.cyan/blue}] {percent:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static UNBOUNDED_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Shows digits checked and the best window so far
///
/// Sources with a known digit count get a bar; unbounded sources a spinner.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Reporter for a search starting at `start_index`
    pub fn new(start_index: u64, digit_count: Option<u64>) -> Self {
        let bar = match digit_count {
            // The remote service's bound is too large for a meaningful bar
            Some(count) if count <= u64::from(u32::MAX) => {
                let bar = ProgressBar::new(count);
                bar.set_style(BOUNDED_STYLE.clone());
                bar
            }
            _ => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(UNBOUNDED_STYLE.clone());
                bar.enable_steady_tick(Duration::from_millis(250));
                bar
            }
        };
        bar.set_position(start_index);
        Self { bar }
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Refresh with the current position and best result
    pub fn update(&self, next_index: u64, best: Option<&FitResult>) {
        self.bar.set_position(next_index);
        self.bar.set_message(status_message(next_index, best));
    }

    /// Print a line above the bar
    pub fn announce(&self, line: &str) {
        self.bar.println(line);
    }

    /// Remove the display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// One-line status: digits checked, best index and score
pub fn status_message(next_index: u64, best: Option<&FitResult>) -> String {
    match best {
        Some(best) => format!(
            "{} digits checked, best score {} at digit {}",
            crate::io::report::thousands(next_index),
            best.error_score,
            crate::io::report::thousands(best.start_index)
        ),
        None => format!(
            "{} digits checked",
            crate::io::report::thousands(next_index)
        ),
    }
}
