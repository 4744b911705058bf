//! User-adjustable timer settings.
//!
//! Lengths are stored in seconds. The minute ranges mirror the dashboard
//! sliders; [`TimerConfig::from_minutes`] and the `with_*` builders clamp
//! into them, [`TimerConfig::validate`] rejects anything outside.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::mode::TimerMode;
use crate::error::ValidationError;
use crate::notify::NotifyOptions;

pub const SESSION_MINUTES: RangeInclusive<u32> = 5..=90;
pub const BREAK_MINUTES: RangeInclusive<u32> = 1..=30;
pub const LONG_BREAK_MINUTES: RangeInclusive<u32> = 5..=60;
pub const SESSIONS_BEFORE_LONG_BREAK: RangeInclusive<u32> = 2..=8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub session_length_secs: u32,
    pub break_length_secs: u32,
    pub long_break_length_secs: u32,
    pub sessions_before_long_break: u32,
    pub auto_start_break: bool,
    pub auto_start_session: bool,
    pub sound_on: bool,
    pub vibration_on: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            session_length_secs: 25 * 60,
            break_length_secs: 5 * 60,
            long_break_length_secs: 15 * 60,
            sessions_before_long_break: 4,
            auto_start_break: true,
            auto_start_session: false,
            sound_on: true,
            vibration_on: false,
        }
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

fn check(field: &str, value: u32, range: RangeInclusive<u32>) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value as u64,
            min: *range.start() as u64,
            max: *range.end() as u64,
        })
    }
}

fn secs(range: RangeInclusive<u32>) -> RangeInclusive<u32> {
    range.start() * 60..=range.end() * 60
}

impl TimerConfig {
    /// Build a config from minute values, clamping each into its range.
    pub fn from_minutes(
        session_min: u32,
        break_min: u32,
        long_break_min: u32,
        sessions_before_long_break: u32,
    ) -> Self {
        Self::default()
            .with_session_minutes(session_min)
            .with_break_minutes(break_min)
            .with_long_break_minutes(long_break_min)
            .with_sessions_before_long_break(sessions_before_long_break)
    }

    pub fn with_session_minutes(mut self, minutes: u32) -> Self {
        self.session_length_secs = clamp(minutes, &SESSION_MINUTES) * 60;
        self
    }

    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.break_length_secs = clamp(minutes, &BREAK_MINUTES) * 60;
        self
    }

    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_length_secs = clamp(minutes, &LONG_BREAK_MINUTES) * 60;
        self
    }

    pub fn with_sessions_before_long_break(mut self, count: u32) -> Self {
        self.sessions_before_long_break = clamp(count, &SESSIONS_BEFORE_LONG_BREAK);
        self
    }

    pub fn with_auto_start(mut self, auto_start_break: bool, auto_start_session: bool) -> Self {
        self.auto_start_break = auto_start_break;
        self.auto_start_session = auto_start_session;
        self
    }

    /// Check every field against its range.
    ///
    /// # Errors
    /// Returns the first field found outside its permitted range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check("session_length_secs", self.session_length_secs, secs(SESSION_MINUTES))?;
        check("break_length_secs", self.break_length_secs, secs(BREAK_MINUTES))?;
        check(
            "long_break_length_secs",
            self.long_break_length_secs,
            secs(LONG_BREAK_MINUTES),
        )?;
        check(
            "sessions_before_long_break",
            self.sessions_before_long_break,
            SESSIONS_BEFORE_LONG_BREAK,
        )?;
        Ok(())
    }

    /// Length of a phase in seconds.
    pub fn duration_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.session_length_secs,
            TimerMode::Break => self.break_length_secs,
            TimerMode::LongBreak => self.long_break_length_secs,
        }
    }

    pub fn notify_options(&self) -> NotifyOptions {
        NotifyOptions {
            sound: self.sound_on,
            vibrate: self.vibration_on,
        }
    }
}
