//! Copy-to-clipboard of the export HTML, with the transient button label
//! that reports the outcome.

use crate::error::ClipboardError;
use std::time::{Duration, Instant};

pub const COPY_LABEL: &str = "Copy export HTML";
pub const COPIED_LABEL: &str = "Copied!";
pub const COPY_FAILED_LABEL: &str = "Copy failed";

/// How long a success or failure label stays before reverting.
pub const STATUS_RESET_DELAY: Duration = Duration::from_millis(1400);

/// Destination for exported HTML, written as plain text.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStatus {
    Idle,
    Copied,
    Failed,
}

/// State of the copy button. Clipboard errors end here as a label and are
/// never returned to the caller.
#[derive(Debug, Clone)]
pub struct CopyButton {
    status: CopyStatus,
    changed_at: Option<Instant>,
    reset_delay: Duration,
}

impl Default for CopyButton {
    fn default() -> Self {
        Self {
            status: CopyStatus::Idle,
            changed_at: None,
            reset_delay: STATUS_RESET_DELAY,
        }
    }
}

impl CopyButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reset_delay(reset_delay: Duration) -> Self {
        Self {
            reset_delay,
            ..Self::default()
        }
    }

    /// Write `html` to `sink` and record the outcome at `now`.
    pub fn copy(&mut self, sink: &mut dyn ClipboardSink, html: &str, now: Instant) -> CopyStatus {
        self.status = match sink.write_text(html) {
            Ok(()) => {
                tracing::debug!(bytes = html.len(), "copied export html");
                CopyStatus::Copied
            }
            Err(err) => {
                tracing::warn!(error = %err, "clipboard write failed");
                CopyStatus::Failed
            }
        };
        self.changed_at = Some(now);
        self.status
    }

    /// Status as seen at `now`; transient statuses revert to idle after the delay.
    pub fn status(&self, now: Instant) -> CopyStatus {
        match self.changed_at {
            Some(at) if now.saturating_duration_since(at) < self.reset_delay => self.status,
            _ => CopyStatus::Idle,
        }
    }

    pub fn label(&self, now: Instant) -> &'static str {
        match self.status(now) {
            CopyStatus::Idle => COPY_LABEL,
            CopyStatus::Copied => COPIED_LABEL,
            CopyStatus::Failed => COPY_FAILED_LABEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Option<String>,
    }

    impl ClipboardSink for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    struct DeniedClipboard;

    impl ClipboardSink for DeniedClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::PermissionDenied)
        }
    }

    #[test]
    fn test_copy_success_label_reverts() {
        let start = Instant::now();
        let mut clipboard = MemoryClipboard::default();
        let mut button = CopyButton::new();
        assert_eq!(button.label(start), COPY_LABEL);

        assert_eq!(button.copy(&mut clipboard, "<p>x</p>", start), CopyStatus::Copied);
        assert_eq!(clipboard.contents.as_deref(), Some("<p>x</p>"));
        assert_eq!(button.label(start + Duration::from_millis(500)), COPIED_LABEL);
        assert_eq!(button.label(start + STATUS_RESET_DELAY), COPY_LABEL);
    }

    #[test]
    fn test_copy_failure_is_reported_not_raised() {
        let start = Instant::now();
        let mut button = CopyButton::new();
        assert_eq!(button.copy(&mut DeniedClipboard, "x", start), CopyStatus::Failed);
        assert_eq!(button.label(start), COPY_FAILED_LABEL);
        assert_eq!(button.label(start + Duration::from_secs(2)), COPY_LABEL);
    }

    #[test]
    fn test_second_copy_restarts_timer() {
        let start = Instant::now();
        let mut button = CopyButton::with_reset_delay(Duration::from_millis(100));
        button.copy(&mut DeniedClipboard, "x", start);
        let later = start + Duration::from_millis(80);
        button.copy(&mut MemoryClipboard::default(), "x", later);
        assert_eq!(button.status(start + Duration::from_millis(150)), CopyStatus::Copied);
        assert_eq!(button.status(later + Duration::from_millis(100)), CopyStatus::Idle);
    }
}
