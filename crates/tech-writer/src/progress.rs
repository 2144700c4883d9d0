//! Terminal spinner shown while waiting on the model
//!
//! Draws on stderr so stdout stays reserved for the output file path.

use std::io::{stderr, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

// ANSI escape codes
const CLEAR_LINE: &str = "\x1b[2K\r";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CYAN: &str = "\x1b[96m";
const RESET: &str = "\x1b[0m";

/// Spinner animation frames
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Alternative ASCII spinner for terminals that don't support Unicode
const ASCII_SPINNER: &[&str] = &["|", "/", "-", "\\"];

/// A terminal spinner for showing progress
pub struct Spinner {
    message: String,
    is_running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
    use_unicode: bool,
}

impl Spinner {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_running: Arc::new(AtomicBool::new(false)),
            handle: None,
            use_unicode: supports_unicode(),
        }
    }

    /// Start a spinner only when stderr is an interactive terminal
    pub fn start_if_terminal(message: impl Into<String>) -> Option<Self> {
        if !stderr().is_terminal() {
            return None;
        }
        let mut spinner = Self::new(message);
        spinner.start();
        Some(spinner)
    }

    /// Start the spinner animation
    pub fn start(&mut self) {
        if self.is_running.swap(true, Ordering::SeqCst) {
            return;
        }

        let is_running = self.is_running.clone();
        let message = self.message.clone();
        let frames = if self.use_unicode { SPINNER_FRAMES } else { ASCII_SPINNER };

        self.handle = Some(tokio::spawn(async move {
            let mut idx = 0;
            let mut tick = interval(Duration::from_millis(80));
            let mut err = stderr();

            let _ = write!(err, "{}", HIDE_CURSOR);

            while is_running.load(Ordering::SeqCst) {
                let _ = write!(err, "{}{}{} {}{}", CLEAR_LINE, CYAN, frames[idx], message, RESET);
                let _ = err.flush();
                idx = (idx + 1) % frames.len();
                tick.tick().await;
            }

            let _ = write!(err, "{}{}", CLEAR_LINE, SHOW_CURSOR);
            let _ = err.flush();
        }));
    }

    /// Stop the spinner silently
    pub async fn stop(&mut self) {
        self.is_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.is_running.store(false, Ordering::SeqCst);
    }
}

fn supports_unicode() -> bool {
    std::env::var("LANG")
        .or_else(|_| std::env::var("LC_ALL"))
        .map(|v| v.to_uppercase().contains("UTF"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spinner_start_stop() {
        let mut spinner = Spinner::new("Waiting for model...");
        spinner.start();
        assert!(spinner.is_running.load(Ordering::SeqCst));

        spinner.stop().await;
        assert!(!spinner.is_running.load(Ordering::SeqCst));
        assert!(spinner.handle.is_none());
    }
}
