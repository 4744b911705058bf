//! Dashboard composition: routes relay alerts, detection readings and timer
//! events into the widgets and produces toasts for the UI.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::context::DashboardContext;
use crate::detection::{PhoneReading, PostureReading};
use crate::events::Event;
use crate::storage::Config;
use crate::realtime::{self, Alert, EventSource, RelayMessage};
use crate::stats::{SessionStats, StatsTracker};
use crate::widgets::{HydrationTracker, Meditation, PhoneMonitor, PostureMonitor};

const TOAST_DURATION_MS: u64 = 5000;
const DEFAULT_ALERT_INTERVAL_MIN: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub description: String,
    pub duration_ms: u64,
}

impl Toast {
    fn new(level: ToastLevel, title: &str, description: &str) -> Self {
        Self {
            level,
            title: title.to_string(),
            description: description.to_string(),
            duration_ms: TOAST_DURATION_MS,
        }
    }
}

/// Camera feed status as seen by the monitoring card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraStatus {
    available: bool,
    error: Option<String>,
    monitoring: bool,
}

impl CameraStatus {
    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Monitoring can only be toggled with a working camera.
    pub fn can_toggle(&self) -> bool {
        self.available && self.error.is_none()
    }
}

#[derive(Debug)]
pub struct Dashboard {
    pub context: DashboardContext,
    pub posture: PostureMonitor,
    pub phone: PhoneMonitor,
    pub hydration: HydrationTracker,
    pub meditation: Meditation,
    pub camera: CameraStatus,
    posture_alerts: bool,
    alert_interval: Duration,
    last_posture_alert: Option<DateTime<Utc>>,
    stats: StatsTracker,
}

impl Dashboard {
    pub fn new(context: DashboardContext, now: DateTime<Utc>) -> Self {
        Self {
            context,
            posture: PostureMonitor::new(),
            phone: PhoneMonitor::new(),
            hydration: HydrationTracker::new(now),
            meditation: Meditation::default(),
            camera: CameraStatus::default(),
            posture_alerts: true,
            alert_interval: Duration::minutes(DEFAULT_ALERT_INTERVAL_MIN),
            last_posture_alert: None,
            stats: StatsTracker::new(),
        }
    }

    /// Dashboard configured from the `[ui]` and `[notifications]` sections.
    pub fn from_config(config: &Config, now: DateTime<Utc>) -> Self {
        let interval = Duration::minutes(i64::from(config.notifications.hydration_interval_min));
        let mut dashboard = Self::new(config.dashboard_context(), now)
            .with_hydration(HydrationTracker::with_interval(now, interval));
        dashboard.set_posture_alerts(config.notifications.posture_alerts);
        dashboard.set_alert_interval(Duration::minutes(i64::from(
            config.notifications.interval_min,
        )));
        dashboard
    }

    pub fn with_hydration(mut self, hydration: HydrationTracker) -> Self {
        self.hydration = hydration;
        self
    }

    /// Posture alerts off: bad-posture messages still update the monitor
    /// but raise no toast.
    pub fn set_posture_alerts(&mut self, on: bool) {
        self.posture_alerts = on;
    }

    /// Minimum gap between two posture toasts.
    pub fn set_alert_interval(&mut self, interval: Duration) {
        self.alert_interval = interval;
    }

    /// React to a message on the alert channel.
    pub fn handle_message(&mut self, msg: &RelayMessage, now: DateTime<Utc>) -> Option<Toast> {
        match msg.alert() {
            Alert::Hydration => Some(Toast::new(
                ToastLevel::Info,
                "Hydration Reminder",
                "Time to drink some water!",
            )),
            Alert::Posture => {
                self.posture.flag_bad(now);
                self.posture_toast(now)
            }
            Alert::Unhandled(message) => {
                info!(%message, "received unhandled message");
                None
            }
        }
    }

    /// React to a line on the posture log stream. Any message there means
    /// the agent saw bad posture, whatever its text.
    pub fn handle_posture_message(
        &mut self,
        msg: &RelayMessage,
        now: DateTime<Utc>,
    ) -> Option<Toast> {
        debug!(message = %msg.message, "posture log");
        self.posture.flag_bad(now);
        self.posture_toast(now)
    }

    fn posture_toast(&mut self, now: DateTime<Utc>) -> Option<Toast> {
        if !self.posture_alerts {
            return None;
        }
        if let Some(last) = self.last_posture_alert {
            if now - last < self.alert_interval {
                debug!("posture toast suppressed: within alert interval");
                return None;
            }
        }
        self.last_posture_alert = Some(now);
        Some(Toast::new(
            ToastLevel::Warning,
            "Posture Check",
            "Sit up straight! Take care of your back.",
        ))
    }

    pub fn record_posture(&mut self, reading: &PostureReading) {
        self.posture.record(reading);
    }

    pub fn record_phone(&mut self, reading: &PhoneReading) {
        self.phone.record_reading(reading);
    }

    pub fn record_timer_event(&mut self, event: &Event) {
        self.stats.record_event(event);
    }

    pub fn log_water(&mut self, now: DateTime<Utc>) {
        self.hydration.log_water(now);
    }

    /// Hydration reminder toast if the interval has elapsed.
    pub fn hydration_check(&self, now: DateTime<Utc>) -> Option<Toast> {
        self.hydration.is_due(now).then(|| {
            Toast::new(
                ToastLevel::Info,
                "Hydration Reminder",
                &self.hydration.reminder_text(),
            )
        })
    }

    pub fn camera_ready(&mut self) {
        self.camera.available = true;
        self.camera.error = None;
    }

    pub fn camera_failed(&mut self, error: impl Into<String>) -> Toast {
        let error = error.into();
        warn!(%error, "camera access error");
        self.camera.available = false;
        self.camera.error = Some(error);
        self.camera.monitoring = false;
        Toast::new(
            ToastLevel::Error,
            "Camera Error",
            "Could not access your camera. Please check permissions.",
        )
    }

    /// Flip monitoring on/off. No-op without a working camera.
    pub fn toggle_monitoring(&mut self) -> bool {
        if self.camera.can_toggle() {
            self.camera.monitoring = !self.camera.monitoring;
        }
        self.camera.monitoring
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.summarize(
            self.posture.issues(),
            self.phone.instances(),
            self.hydration.glasses(),
        )
    }
}

type MessageHandler = fn(&mut Dashboard, &RelayMessage, DateTime<Utc>) -> Option<Toast>;

/// Feed the alert channel into a shared dashboard. Toasts go to
/// `on_toast`.
pub fn attach<F>(
    dashboard: Arc<Mutex<Dashboard>>,
    source: &dyn EventSource,
    channel: &str,
    event: &str,
    on_toast: F,
) -> JoinHandle<()>
where
    F: FnMut(Toast) + Send + 'static,
{
    attach_with(dashboard, source, channel, event, Dashboard::handle_message, on_toast)
}

/// Feed the posture log stream into a shared dashboard.
pub fn attach_posture<F>(
    dashboard: Arc<Mutex<Dashboard>>,
    source: &dyn EventSource,
    channel: &str,
    event: &str,
    on_toast: F,
) -> JoinHandle<()>
where
    F: FnMut(Toast) + Send + 'static,
{
    attach_with(
        dashboard,
        source,
        channel,
        event,
        Dashboard::handle_posture_message,
        on_toast,
    )
}

fn attach_with<F>(
    dashboard: Arc<Mutex<Dashboard>>,
    source: &dyn EventSource,
    channel: &str,
    event: &str,
    handler: MessageHandler,
    mut on_toast: F,
) -> JoinHandle<()>
where
    F: FnMut(Toast) + Send + 'static,
{
    let subscription = source.subscribe(channel, event);
    realtime::spawn_handler(subscription, move |msg| {
        let toast = {
            let mut dashboard = dashboard.lock().unwrap_or_else(|e| e.into_inner());
            handler(&mut dashboard, &msg, Utc::now())
        };
        if let Some(toast) = toast {
            on_toast(toast);
        }
    })
}
