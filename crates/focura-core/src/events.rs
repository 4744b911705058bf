use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every timer state change produces an Event.
/// The CLI prints them; the stats tracker and the tick driver's
/// subscribers consume them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero and the machine moved to the next one.
    PhaseCompleted {
        from: TimerMode,
        to: TimerMode,
        /// Length of the phase that just finished.
        duration_secs: u32,
        /// Length of the phase that was entered.
        next_duration_secs: u32,
        completed_sessions: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        label: String,
        remaining_secs: u32,
        total_secs: u32,
        clock: String,
        is_running: bool,
        completed_sessions: u32,
        session_number: u32,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at }
            | Event::PhaseCompleted { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }

    /// Whether this event marks the end of a focus session.
    pub fn is_focus_completion(&self) -> bool {
        matches!(
            self,
            Event::PhaseCompleted {
                from: TimerMode::Focus,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_serialization() {
        let event = Event::PhaseCompleted {
            from: TimerMode::Focus,
            to: TimerMode::LongBreak,
            duration_secs: 1500,
            next_duration_secs: 900,
            completed_sessions: 4,
            auto_started: true,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_completed");
        assert_eq!(json["to"], "long_break");
        assert!(event.is_focus_completion());

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
