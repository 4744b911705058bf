use serde::{Deserialize, Serialize};

/// Phase of the pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Focus,
    Break,
    LongBreak,
}

impl TimerMode {
    /// Label shown above the countdown.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus Session",
            TimerMode::Break => "Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, TimerMode::Focus)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::Break => "break",
            TimerMode::LongBreak => "long_break",
        }
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Focus
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_dashboard_text() {
        assert_eq!(TimerMode::Focus.label(), "Focus Session");
        assert_eq!(TimerMode::Break.label(), "Break");
        assert_eq!(TimerMode::LongBreak.label(), "Long Break");
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&TimerMode::LongBreak).unwrap();
        assert_eq!(json, "\"long_break\"");
    }
}
