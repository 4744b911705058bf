use serde::{Deserialize, Serialize};

use crate::timer::format_clock;

/// Guided meditation countdown. Closes itself when it reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meditation {
    duration_secs: u32,
    seconds_left: u32,
    open: bool,
}

impl Default for Meditation {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Meditation {
    pub fn new(duration_min: u32) -> Self {
        let duration_secs = duration_min.max(1) * 60;
        Self {
            duration_secs,
            seconds_left: duration_secs,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn open(&mut self) {
        self.seconds_left = self.duration_secs;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Returns true on the tick that finishes the meditation.
    pub fn tick(&mut self) -> bool {
        if !self.open || self.seconds_left == 0 {
            return false;
        }
        self.seconds_left -= 1;
        if self.seconds_left == 0 {
            self.open = false;
            return true;
        }
        false
    }

    pub fn clock(&self) -> String {
        format_clock(self.seconds_left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_meditation_does_not_count() {
        let mut m = Meditation::default();
        assert!(!m.tick());
        assert_eq!(m.clock(), "05:00");
    }

    #[test]
    fn runs_down_and_auto_closes() {
        let mut m = Meditation::new(1);
        m.open();
        for _ in 0..59 {
            assert!(!m.tick());
        }
        assert_eq!(m.clock(), "00:01");
        assert!(m.tick());
        assert!(!m.is_open());
        assert!(!m.tick());
    }

    #[test]
    fn reopening_restarts() {
        let mut m = Meditation::new(1);
        m.open();
        m.tick();
        m.close();
        m.open();
        assert_eq!(m.seconds_left(), 60);
    }
}
