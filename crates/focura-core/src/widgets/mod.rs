//! State behind the dashboard cards.

mod hydration;
mod meditation;
mod monitor;

pub use hydration::HydrationTracker;
pub use meditation::Meditation;
pub use monitor::{PhoneMonitor, PostureMonitor, PostureStatus};
