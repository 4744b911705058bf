mod engine;
mod mode;
mod runner;
mod settings;

pub use engine::{format_clock, ConfigUpdate, TimerEngine, TimerState};
pub use mode::TimerMode;
pub use runner::TimerRunner;
pub use settings::{
    TimerConfig, BREAK_MINUTES, LONG_BREAK_MINUTES, SESSIONS_BEFORE_LONG_BREAK, SESSION_MINUTES,
};
