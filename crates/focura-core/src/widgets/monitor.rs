use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detection::{PhoneReading, Posture, PostureReading};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureStatus {
    Good,
    Bad,
    Unknown,
}

impl From<Posture> for PostureStatus {
    fn from(p: Posture) -> Self {
        match p {
            Posture::Good => PostureStatus::Good,
            Posture::Bad => PostureStatus::Bad,
        }
    }
}

/// Latest posture verdict plus a count of slips into bad posture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostureMonitor {
    status: PostureStatus,
    last_checked: Option<DateTime<Utc>>,
    issues: u32,
}

impl Default for PostureMonitor {
    fn default() -> Self {
        Self {
            status: PostureStatus::Unknown,
            last_checked: None,
            issues: 0,
        }
    }
}

impl PostureMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> PostureStatus {
        self.status
    }

    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    /// Times the status went from not-bad to bad.
    pub fn issues(&self) -> u32 {
        self.issues
    }

    pub fn record(&mut self, reading: &PostureReading) {
        self.set(reading.posture.into(), reading.timestamp);
    }

    /// A relay reported bad posture.
    pub fn flag_bad(&mut self, at: DateTime<Utc>) {
        self.set(PostureStatus::Bad, at);
    }

    fn set(&mut self, status: PostureStatus, at: DateTime<Utc>) {
        if status == PostureStatus::Bad && self.status != PostureStatus::Bad {
            self.issues += 1;
        }
        self.status = status;
        self.last_checked = Some(at);
    }

    pub fn headline(&self) -> &'static str {
        match self.status {
            PostureStatus::Good => "Your posture looks good!",
            PostureStatus::Bad => "Please correct your posture!",
            PostureStatus::Unknown => "Monitoring your posture...",
        }
    }
}

/// Phone-in-hand tracking; counts rising edges only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhoneMonitor {
    on_phone: bool,
    instances: u32,
}

impl PhoneMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on_phone(&self) -> bool {
        self.on_phone
    }

    pub fn instances(&self) -> u32 {
        self.instances
    }

    pub fn record(&mut self, detected: bool) {
        if detected && !self.on_phone {
            self.instances += 1;
        }
        self.on_phone = detected;
    }

    pub fn record_reading(&mut self, reading: &PhoneReading) {
        self.record(reading.phone_detected);
    }

    pub fn summary(&self) -> String {
        if self.on_phone {
            "Phone detected! Stay focused.".to_string()
        } else if self.instances == 0 {
            "No phone distractions detected in this session.".to_string()
        } else {
            format!(
                "Phone distractions detected: {} times this session",
                self.instances
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(posture: Posture) -> PostureReading {
        PostureReading {
            posture,
            confidence: 0.85,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn posture_starts_unknown() {
        let m = PostureMonitor::new();
        assert_eq!(m.status(), PostureStatus::Unknown);
        assert!(m.last_checked().is_none());
        assert_eq!(m.headline(), "Monitoring your posture...");
    }

    #[test]
    fn posture_issues_count_slips_not_readings() {
        let mut m = PostureMonitor::new();
        m.record(&reading(Posture::Bad));
        m.record(&reading(Posture::Bad));
        m.record(&reading(Posture::Good));
        m.flag_bad(Utc::now());
        assert_eq!(m.issues(), 2);
        assert_eq!(m.status(), PostureStatus::Bad);
        assert_eq!(m.headline(), "Please correct your posture!");
        assert!(m.last_checked().is_some());
    }

    #[test]
    fn phone_counts_rising_edges() {
        let mut m = PhoneMonitor::new();
        assert_eq!(
            m.summary(),
            "No phone distractions detected in this session."
        );
        m.record(true);
        m.record(true);
        assert_eq!(m.summary(), "Phone detected! Stay focused.");
        m.record(false);
        m.record(true);
        m.record(false);
        assert_eq!(m.instances(), 2);
        assert_eq!(
            m.summary(),
            "Phone distractions detected: 2 times this session"
        );
    }
}
