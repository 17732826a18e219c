//! Transient status-bar messages.

use std::time::{Duration, Instant};

/// How long action messages stay visible.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_millis(3000);

/// A single transient message slot; a new message replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    message: Option<(String, Instant)>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text` until `now + timeout`.
    pub fn show(&mut self, text: impl Into<String>, timeout: Duration, now: Instant) {
        let text = text.into();
        tracing::debug!("Status: {}", text);
        self.message = Some((text, now + timeout));
    }

    /// The message still visible at `now`, if any.
    pub fn current(&self, now: Instant) -> Option<&str> {
        match &self.message {
            Some((text, deadline)) if now < *deadline => Some(text.as_str()),
            _ => None,
        }
    }

    /// Time until the current message expires, for scheduling a repaint.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.message
            .as_ref()
            .and_then(|(_, deadline)| deadline.checked_duration_since(now))
            .filter(|d| !d.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_expires() {
        let now = Instant::now();
        let mut status = StatusLine::new();
        assert_eq!(status.current(now), None);

        status.show("Insert symbol (pending)", MESSAGE_TIMEOUT, now);
        assert_eq!(status.current(now), Some("Insert symbol (pending)"));
        assert_eq!(
            status.current(now + Duration::from_millis(2999)),
            Some("Insert symbol (pending)")
        );
        assert_eq!(status.current(now + MESSAGE_TIMEOUT), None);
        assert_eq!(
            status.remaining(now + Duration::from_millis(1000)),
            Some(Duration::from_millis(2000))
        );
        assert_eq!(status.remaining(now + MESSAGE_TIMEOUT), None);
    }

    #[test]
    fn test_new_message_replaces_old() {
        let now = Instant::now();
        let mut status = StatusLine::new();
        status.show("New (pending)", MESSAGE_TIMEOUT, now);
        status.show("Save (pending)", Duration::from_millis(500), now);
        assert_eq!(status.current(now), Some("Save (pending)"));
        assert_eq!(status.current(now + Duration::from_millis(600)), None);
    }
}
