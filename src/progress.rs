//! Per-line progress reporting for front ends.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Receives progress from a translation run.
pub trait ProgressSink: Send + Sync {
    /// Called once per line, `current` runs from 1 to `total`.
    fn report(&self, current: usize, total: usize);

    /// A recoverable problem the user should see (e.g. detection failed).
    fn notify_error(&self, _message: &str) {}

    /// The run reached the last line.
    fn finish(&self) {}
}

/// Discards everything.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _current: usize, _total: usize) {}
}

/// Observable `current/total` counters plus collected notices.
#[derive(Debug, Default)]
pub struct ProgressState {
    current: AtomicUsize,
    total: AtomicUsize,
    notices: Mutex<Vec<String>>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(current, total)` as last reported.
    pub fn snapshot(&self) -> (usize, usize) {
        (
            self.current.load(Ordering::SeqCst),
            self.total.load(Ordering::SeqCst),
        )
    }

    /// Label in the form the desktop forms used.
    pub fn label(&self) -> String {
        let (current, total) = self.snapshot();
        format!("Processing: {}/{} lines", current, total)
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl ProgressSink for ProgressState {
    fn report(&self, current: usize, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        self.current.store(current, Ordering::SeqCst);
    }

    fn notify_error(&self, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(message.to_string());
        }
    }
}

/// Terminal progress bar.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {msg} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message("Processing: 0/0 lines");
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn report(&self, current: usize, total: usize) {
        if self.bar.length() != Some(total as u64) {
            self.bar.set_length(total as u64);
        }
        self.bar.set_position(current as u64);
        self.bar
            .set_message(format!("Processing: {}/{} lines", current, total));
    }

    fn notify_error(&self, message: &str) {
        self.bar.suspend(|| {
            eprintln!("{} {}", style("!").yellow(), message);
        });
    }

    fn finish(&self) {
        self.bar.finish();
    }
}
