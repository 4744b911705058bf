//! Presentation context handed explicitly to whoever renders the dashboard.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Accent applied to the timer card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerTheme {
    #[default]
    Default,
    Mint,
    Coral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardContext {
    pub theme: Theme,
    pub timer_theme: TimerTheme,
}

impl DashboardContext {
    pub fn new(theme: Theme, timer_theme: TimerTheme) -> Self {
        Self { theme, timer_theme }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }
}

/// Greeting for the local hour of day (0-23).
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_boundaries() {
        assert_eq!(greeting(0), "Good morning");
        assert_eq!(greeting(11), "Good morning");
        assert_eq!(greeting(12), "Good afternoon");
        assert_eq!(greeting(17), "Good afternoon");
        assert_eq!(greeting(18), "Good evening");
    }

    #[test]
    fn toggle_theme_round_trips() {
        let mut ctx = DashboardContext::default();
        assert_eq!(ctx.theme, Theme::Light);
        assert_eq!(ctx.toggle_theme(), Theme::Dark);
        assert_eq!(ctx.toggle_theme(), Theme::Light);
    }
}
