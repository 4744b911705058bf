//! In-memory session statistics. Nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::timer::TimerMode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    /// Focused time in milliseconds.
    pub duration: u64,
    pub posture_issues: u32,
    pub phone_distractions: u32,
    pub focus_percentage: u32,
    pub water_intake: u32,
}

impl SessionStats {
    pub fn study_hours(&self) -> f64 {
        self.duration as f64 / 3_600_000.0
    }
}

/// Accumulates completed timer phases.
#[derive(Debug, Clone, Default)]
pub struct StatsTracker {
    focus_secs: u64,
    break_secs: u64,
    focus_sessions: u32,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self, event: &Event) {
        if let Event::PhaseCompleted {
            from,
            duration_secs,
            ..
        } = event
        {
            match from {
                TimerMode::Focus => {
                    self.focus_secs += *duration_secs as u64;
                    self.focus_sessions += 1;
                }
                TimerMode::Break | TimerMode::LongBreak => {
                    self.break_secs += *duration_secs as u64;
                }
            }
        }
    }

    pub fn focus_sessions(&self) -> u32 {
        self.focus_sessions
    }

    /// Share of elapsed phase time spent focusing, rounded to a whole percent.
    pub fn focus_percentage(&self) -> u32 {
        let total = self.focus_secs + self.break_secs;
        if total == 0 {
            return 0;
        }
        ((self.focus_secs as f64 / total as f64) * 100.0).round() as u32
    }

    pub fn summarize(&self, posture_issues: u32, phone_distractions: u32, water_intake: u32) -> SessionStats {
        SessionStats {
            duration: self.focus_secs * 1000,
            posture_issues,
            phone_distractions,
            focus_percentage: self.focus_percentage(),
            water_intake,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn completed(from: TimerMode, duration_secs: u32) -> Event {
        Event::PhaseCompleted {
            from,
            to: TimerMode::Focus,
            duration_secs,
            next_duration_secs: 0,
            completed_sessions: 0,
            auto_started: false,
            at: Utc::now(),
        }
    }

    #[test]
    fn empty_tracker_reports_zero() {
        let stats = StatsTracker::new().summarize(0, 0, 0);
        assert_eq!(stats, SessionStats::default());
    }

    #[test]
    fn focus_percentage_from_completed_phases() {
        let mut t = StatsTracker::new();
        t.record_event(&completed(TimerMode::Focus, 1500));
        t.record_event(&completed(TimerMode::Break, 300));
        t.record_event(&completed(TimerMode::Focus, 1500));
        t.record_event(&Event::TimerReset { at: Utc::now() });
        // 3000 / 3300
        assert_eq!(t.focus_percentage(), 91);
        assert_eq!(t.focus_sessions(), 2);

        let stats = t.summarize(3, 1, 4);
        assert_eq!(stats.duration, 3_000_000);
        assert!((stats.study_hours() - 0.8333).abs() < 0.001);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(SessionStats::default()).unwrap();
        for key in ["duration", "postureIssues", "phoneDistractions", "focusPercentage", "waterIntake"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
