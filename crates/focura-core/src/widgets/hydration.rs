use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Hydration reminder. The interval re-arms every time water is logged;
/// before the first log it runs from when the tracker was created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationTracker {
    interval_secs: i64,
    created_at: DateTime<Utc>,
    last_drank: Option<DateTime<Utc>>,
    glasses: u32,
}

impl HydrationTracker {
    pub const DEFAULT_INTERVAL_SECS: i64 = 2 * 60 * 60;

    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_interval(now, Duration::seconds(Self::DEFAULT_INTERVAL_SECS))
    }

    pub fn with_interval(now: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            interval_secs: interval.num_seconds().max(1),
            created_at: now,
            last_drank: None,
            glasses: 0,
        }
    }

    pub fn glasses(&self) -> u32 {
        self.glasses
    }

    pub fn last_drank(&self) -> Option<DateTime<Utc>> {
        self.last_drank
    }

    pub fn interval(&self) -> Duration {
        Duration::seconds(self.interval_secs)
    }

    pub fn log_water(&mut self, now: DateTime<Utc>) {
        self.glasses += 1;
        self.last_drank = Some(now);
    }

    /// Time until the next reminder, floored at zero.
    pub fn next_due(&self, now: DateTime<Utc>) -> Duration {
        let since = self.last_drank.unwrap_or(self.created_at);
        let remaining = self.interval() - (now - since);
        remaining.max(Duration::zero())
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_due(now) == Duration::zero()
    }

    pub fn reminder_text(&self) -> String {
        let hours = self.interval_secs / 3600;
        let span = match hours {
            0 => format!("{} minutes", self.interval_secs / 60),
            1 => "1 hour".to_string(),
            h => format!("{h} hours"),
        };
        format!("It's been {span} since your last water break. Time to hydrate!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reminder_counts_from_creation() {
        let t0 = Utc::now();
        let tracker = HydrationTracker::new(t0);
        assert_eq!(tracker.next_due(t0), Duration::hours(2));
        assert!(!tracker.is_due(t0 + Duration::minutes(119)));
        assert!(tracker.is_due(t0 + Duration::hours(2)));
        assert!(tracker.is_due(t0 + Duration::hours(5)));
    }

    #[test]
    fn logging_water_rearms() {
        let t0 = Utc::now();
        let mut tracker = HydrationTracker::new(t0);
        tracker.log_water(t0 + Duration::hours(1));
        assert_eq!(tracker.glasses(), 1);
        assert_eq!(
            tracker.next_due(t0 + Duration::hours(2)),
            Duration::hours(1)
        );
    }

    #[test]
    fn reminder_text_uses_interval() {
        let t0 = Utc::now();
        assert_eq!(
            HydrationTracker::new(t0).reminder_text(),
            "It's been 2 hours since your last water break. Time to hydrate!"
        );
        let short = HydrationTracker::with_interval(t0, Duration::minutes(30));
        assert!(short.reminder_text().contains("30 minutes"));
    }
}
