//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads - the caller (usually [`super::TimerRunner`]) invokes
//! `tick()` once per second while the timer runs.
//!
//! ## State Transitions
//!
//! ```text
//! Focus -> Break -> Focus -> ... -> Focus -> LongBreak -> Focus
//!          (every Nth completed focus session gets a long break)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerConfig::default(), Arc::new(LogSink));
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::PhaseCompleted) on a transition
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::mode::TimerMode;
use super::settings::{
    TimerConfig, BREAK_MINUTES, LONG_BREAK_MINUTES, SESSIONS_BEFORE_LONG_BREAK, SESSION_MINUTES,
};
use crate::error::ValidationError;
use crate::events::Event;
use crate::notify::{NotificationSink, NotifyKind, NullSink};

/// Mutable state owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_secs: u32,
    pub is_running: bool,
    pub completed_sessions: u32,
}

/// Outcome of a settings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigUpdate {
    Applied,
    /// The timer was running; nothing changed.
    Rejected,
}

impl ConfigUpdate {
    pub fn is_applied(&self) -> bool {
        matches!(self, ConfigUpdate::Applied)
    }
}

/// Core timer engine.
pub struct TimerEngine {
    config: TimerConfig,
    state: TimerState,
    sink: Arc<dyn NotificationSink>,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    /// Create a new engine in Focus mode, not running.
    pub fn new(config: TimerConfig, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            state: TimerState {
                mode: TimerMode::Focus,
                remaining_secs: config.session_length_secs,
                is_running: false,
                completed_sessions: 0,
            },
            config,
            sink,
        }
    }

    /// Engine that drops all notifications.
    pub fn silent(config: TimerConfig) -> Self {
        Self::new(config, Arc::new(NullSink))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn completed_sessions(&self) -> u32 {
        self.state.completed_sessions
    }

    pub fn total_secs(&self) -> u32 {
        self.config.duration_for(self.state.mode)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - (self.state.remaining_secs as f64 / total as f64)).clamp(0.0, 1.0)
    }

    /// Number shown as "Session #N": the session in progress during focus,
    /// the last finished one during a break.
    pub fn session_number(&self) -> u32 {
        match self.state.mode {
            TimerMode::Focus => self.state.completed_sessions + 1,
            _ => self.state.completed_sessions,
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn clock(&self) -> String {
        format_clock(self.state.remaining_secs)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.state.mode,
            label: self.state.mode.label().to_string(),
            remaining_secs: self.state.remaining_secs,
            total_secs: self.total_secs(),
            clock: self.clock(),
            is_running: self.state.is_running,
            completed_sessions: self.state.completed_sessions,
            session_number: self.session_number(),
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running {
            debug!("start ignored: already running");
            return None;
        }
        self.state.is_running = true;
        info!(mode = %self.state.mode, remaining_secs = self.state.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            debug!("pause ignored: not running");
            return None;
        }
        self.state.is_running = false;
        info!(mode = %self.state.mode, remaining_secs = self.state.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Start/Pause button.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.state.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState {
            mode: TimerMode::Focus,
            remaining_secs: self.config.session_length_secs,
            is_running: false,
            completed_sessions: 0,
        };
        info!("timer reset");
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Advance one second. Returns `Some(Event::PhaseCompleted)` when the
    /// current phase runs out.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        if self.state.remaining_secs > 1 {
            self.state.remaining_secs -= 1;
            return None;
        }
        Some(self.complete_phase())
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Apply `f` to the config if the timer is idle.
    ///
    /// When the length of the current phase changes, the countdown is
    /// re-seeded from the new length.
    pub fn update_config(&mut self, f: impl FnOnce(&mut TimerConfig)) -> ConfigUpdate {
        if self.state.is_running {
            warn!("config change rejected: timer is running");
            return ConfigUpdate::Rejected;
        }
        let before = self.total_secs();
        f(&mut self.config);
        let after = self.total_secs();
        if before != after {
            self.state.remaining_secs = after;
        }
        debug!(config = ?self.config, "config updated");
        ConfigUpdate::Applied
    }

    /// Replace the whole config.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if `config` is out of range; the running
    /// gate is checked afterwards and reported as [`ConfigUpdate::Rejected`].
    pub fn set_config(&mut self, config: TimerConfig) -> Result<ConfigUpdate, ValidationError> {
        config.validate()?;
        Ok(self.update_config(|c| *c = config))
    }

    pub fn set_session_length(&mut self, minutes: u32) -> ConfigUpdate {
        let secs = minutes.clamp(*SESSION_MINUTES.start(), *SESSION_MINUTES.end()) * 60;
        self.update_config(|c| c.session_length_secs = secs)
    }

    pub fn set_break_length(&mut self, minutes: u32) -> ConfigUpdate {
        let secs = minutes.clamp(*BREAK_MINUTES.start(), *BREAK_MINUTES.end()) * 60;
        self.update_config(|c| c.break_length_secs = secs)
    }

    pub fn set_long_break_length(&mut self, minutes: u32) -> ConfigUpdate {
        let secs = minutes.clamp(*LONG_BREAK_MINUTES.start(), *LONG_BREAK_MINUTES.end()) * 60;
        self.update_config(|c| c.long_break_length_secs = secs)
    }

    pub fn set_sessions_before_long_break(&mut self, count: u32) -> ConfigUpdate {
        let count = count.clamp(
            *SESSIONS_BEFORE_LONG_BREAK.start(),
            *SESSIONS_BEFORE_LONG_BREAK.end(),
        );
        self.update_config(|c| c.sessions_before_long_break = count)
    }

    pub fn set_auto_start_break(&mut self, on: bool) -> ConfigUpdate {
        self.update_config(|c| c.auto_start_break = on)
    }

    pub fn set_auto_start_session(&mut self, on: bool) -> ConfigUpdate {
        self.update_config(|c| c.auto_start_session = on)
    }

    pub fn set_sound_on(&mut self, on: bool) -> ConfigUpdate {
        self.update_config(|c| c.sound_on = on)
    }

    pub fn set_vibration_on(&mut self, on: bool) -> ConfigUpdate {
        self.update_config(|c| c.vibration_on = on)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Event {
        let from = self.state.mode;
        let duration_secs = self.config.duration_for(from);

        let (to, kind, auto_start) = match from {
            TimerMode::Focus => {
                self.state.completed_sessions += 1;
                let every = self.config.sessions_before_long_break.max(1);
                let to = if self.state.completed_sessions % every == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::Break
                };
                (to, NotifyKind::SessionEnd, self.config.auto_start_break)
            }
            TimerMode::Break | TimerMode::LongBreak => (
                TimerMode::Focus,
                NotifyKind::BreakEnd,
                self.config.auto_start_session,
            ),
        };

        self.state.mode = to;
        self.state.remaining_secs = self.config.duration_for(to);
        self.state.is_running = auto_start;
        self.sink.notify(kind, self.config.notify_options());

        info!(
            from = %from,
            to = %to,
            completed_sessions = self.state.completed_sessions,
            auto_started = auto_start,
            "phase completed"
        );

        Event::PhaseCompleted {
            from,
            to,
            duration_secs,
            next_duration_secs: self.state.remaining_secs,
            completed_sessions: self.state.completed_sessions,
            auto_started: auto_start,
            at: Utc::now(),
        }
    }
}

/// Format seconds as zero-padded `MM:SS`.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
