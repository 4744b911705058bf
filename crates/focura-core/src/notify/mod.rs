//! Notification sinks fired on timer phase transitions.
//!
//! Delivery is fire-and-forget: a sink never reports failure back to the
//! timer. Unsupported capabilities (e.g. vibration on a terminal) are
//! ignored by the sink.

use std::io::Write;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotifyKind {
    /// A focus session just ended.
    SessionEnd,
    /// A break (short or long) just ended.
    BreakEnd,
}

impl NotifyKind {
    /// Vibration pulse length in milliseconds.
    pub fn vibration_ms(&self) -> u64 {
        match self {
            NotifyKind::SessionEnd => 500,
            NotifyKind::BreakEnd => 300,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyKind::SessionEnd => "session-end",
            NotifyKind::BreakEnd => "break-end",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyOptions {
    pub sound: bool,
    pub vibrate: bool,
}

impl NotifyOptions {
    pub fn is_silent(&self) -> bool {
        !self.sound && !self.vibrate
    }
}

/// Receiver of timer transition notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotifyKind, opts: NotifyOptions);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, kind: NotifyKind, opts: NotifyOptions) {
        (**self).notify(kind, opts)
    }
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _kind: NotifyKind, _opts: NotifyOptions) {}
}

/// Emits notifications as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, kind: NotifyKind, opts: NotifyOptions) {
        if opts.is_silent() {
            debug!(kind = kind.as_str(), "notification muted");
            return;
        }
        info!(
            kind = kind.as_str(),
            sound = opts.sound,
            vibrate_ms = if opts.vibrate { kind.vibration_ms() } else { 0 },
            "timer notification"
        );
    }
}

/// Rings the terminal bell on stderr when sound is enabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn notify(&self, kind: NotifyKind, opts: NotifyOptions) {
        if opts.sound {
            let mut stderr = std::io::stderr();
            let _ = stderr.write_all(b"\x07");
            let _ = stderr.flush();
        }
        if opts.vibrate {
            debug!(kind = kind.as_str(), "vibration not supported by terminal sink");
        }
    }
}

/// Records every notification it receives. Useful in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<(NotifyKind, NotifyOptions)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(NotifyKind, NotifyOptions)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self, kind: NotifyKind) -> usize {
        self.calls().iter().filter(|(k, _)| *k == kind).count()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, kind: NotifyKind, opts: NotifyOptions) {
        let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.push((kind, opts));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vibration_pulses() {
        assert_eq!(NotifyKind::SessionEnd.vibration_ms(), 500);
        assert_eq!(NotifyKind::BreakEnd.vibration_ms(), 300);
    }

    #[test]
    fn recording_sink_through_arc() {
        let sink = Arc::new(RecordingSink::new());
        let shared: Arc<dyn NotificationSink> = sink.clone();
        shared.notify(
            NotifyKind::SessionEnd,
            NotifyOptions {
                sound: true,
                vibrate: false,
            },
        );
        shared.notify(NotifyKind::BreakEnd, NotifyOptions::default());
        assert_eq!(sink.calls().len(), 2);
        assert_eq!(sink.count(NotifyKind::SessionEnd), 1);
        assert!(sink.calls()[1].1.is_silent());
    }

    #[test]
    fn kind_serializes_as_dashboard_name() {
        let json = serde_json::to_string(&NotifyKind::BreakEnd).unwrap();
        assert_eq!(json, "\"break-end\"");
    }
}
