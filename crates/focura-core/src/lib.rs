//! # Focura Core Library
//!
//! Core logic for the Focura wellness dashboard: a pomodoro-style focus
//! timer plus the glue around it. The CLI binary and any UI shell are thin
//! layers over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a pure state machine ([`TimerEngine`]) advanced one second
//!   per `tick()`, and a tokio driver ([`TimerRunner`]) that owns the tick
//!   source and publishes [`Event`]s
//! - **Notifications**: end-of-phase cues go through a [`NotificationSink`]
//! - **Realtime**: channel/event subscriptions carrying wellness alerts
//! - **Detection**: the mock posture/phone HTTP service and its client
//! - **Widgets**: posture, phone, hydration and meditation state
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Dashboard`]: Routes alerts and readings into widgets and toasts
//! - [`Config`]: Application configuration management
//! - [`DetectionProvider`]: Trait behind the mock detection endpoints

pub mod context;
pub mod dashboard;
pub mod detection;
pub mod error;
pub mod events;
pub mod notify;
pub mod realtime;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod widgets;

pub use context::{greeting, DashboardContext, Theme, TimerTheme};
pub use dashboard::{attach, attach_posture, CameraStatus, Dashboard, Toast, ToastLevel};
pub use detection::{
    DetectionClient, DetectionProvider, PhoneReading, Posture, PostureReading, RandomDetector,
    ScriptedDetector,
};
pub use error::{ConfigError, CoreError, DetectionError, RelayError, ValidationError};
pub use events::Event;
pub use notify::{NotificationSink, NotifyKind, NotifyOptions};
pub use realtime::{Alert, EventSource, LocalRelay, RelayMessage, Subscription};
pub use stats::{SessionStats, StatsTracker};
pub use storage::Config;
pub use timer::{ConfigUpdate, TimerConfig, TimerEngine, TimerMode, TimerRunner, TimerState};
