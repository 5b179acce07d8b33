//! Loading state: a spinner whose message cycles through fixed phrases.
//!
//! The rotation is cosmetic; it never touches the request it decorates.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;

pub const LOADING_MESSAGES: &[&str] = &[
    "Analyzing core competencies...",
    "Mapping experience to job requirements...",
    "Identifying key skill matches...",
    "Spotting critical experience gaps...",
    "Researching company product culture...",
    "Drafting your personalized pitch...",
    "Finalizing match score...",
];

pub const ROTATION_INTERVAL: Duration = Duration::from_millis(2500);

/// Index cycling over [`LOADING_MESSAGES`].
#[derive(Debug, Clone, Default)]
pub struct StatusRotation {
    index: usize,
}

impl StatusRotation {
    pub fn current(&self) -> &'static str {
        LOADING_MESSAGES[self.index]
    }

    pub fn advance(&mut self) -> &'static str {
        self.index = (self.index + 1) % LOADING_MESSAGES.len();
        self.current()
    }
}

/// Spinner plus the timer task that rotates its message. Dropping it stops
/// the timer and clears the spinner line, so no timer outlives the view.
pub struct LoadingIndicator {
    bar: ProgressBar,
    ticker: Option<JoinHandle<()>>,
}

impl LoadingIndicator {
    /// Must be called from inside a tokio runtime.
    pub fn start(enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let mut rotation = StatusRotation::default();
        bar.set_message(rotation.current());

        let ticking = bar.clone();
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(ROTATION_INTERVAL);
            interval.tick().await; // first tick fires immediately
            loop {
                interval.tick().await;
                ticking.set_message(rotation.advance());
            }
        });

        Self {
            bar,
            ticker: Some(ticker),
        }
    }

    #[cfg(test)]
    fn message(&self) -> String {
        self.bar.message()
    }

    pub fn finish(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        self.bar.finish_and_clear();
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.stop();
    }
}
