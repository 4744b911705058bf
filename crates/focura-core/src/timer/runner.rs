//! Tick driver for [`TimerEngine`].
//!
//! One tokio task ticks the engine once per period while it runs. Every
//! spawn captures a generation number; `pause`, `reset` and `shutdown`
//! bump the generation and abort the task, and a woken tick re-checks its
//! generation under the engine lock before touching state. A tick can
//! therefore never land after any of those calls returns.
//!
//! Ticks and settings changes share the engine lock, so a transition that
//! is due is always applied before a settings change queued behind it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::engine::{ConfigUpdate, TimerEngine, TimerState};
use super::settings::TimerConfig;
use crate::error::Result;
use crate::events::Event;

const EVENT_CAPACITY: usize = 64;

pub struct TimerRunner {
    engine: Arc<Mutex<TimerEngine>>,
    generation: Arc<AtomicU64>,
    task: std::sync::Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<Event>,
    period: Duration,
}

impl TimerRunner {
    /// Drive `engine` with a one-second tick.
    pub fn new(engine: TimerEngine) -> Self {
        Self::with_period(engine, Duration::from_secs(1))
    }

    /// Drive `engine` with a custom tick period (accelerated demos, tests).
    pub fn with_period(engine: TimerEngine, period: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            generation: Arc::new(AtomicU64::new(0)),
            task: std::sync::Mutex::new(None),
            events,
            period,
        }
    }

    /// Receive every event the runner produces from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> TimerState {
        self.engine.lock().await.state()
    }

    pub async fn snapshot(&self) -> Event {
        self.engine.lock().await.snapshot()
    }

    pub async fn start(&self) -> Option<Event> {
        let mut engine = self.engine.lock().await;
        let event = engine.start()?;
        self.spawn_loop();
        drop(engine);
        self.publish(event.clone());
        Some(event)
    }

    pub async fn pause(&self) -> Option<Event> {
        let mut engine = self.engine.lock().await;
        self.cancel_loop();
        let event = engine.pause()?;
        drop(engine);
        self.publish(event.clone());
        Some(event)
    }

    pub async fn toggle(&self) -> Option<Event> {
        let running = self.engine.lock().await.is_running();
        if running {
            self.pause().await
        } else {
            self.start().await
        }
    }

    pub async fn reset(&self) -> Option<Event> {
        let mut engine = self.engine.lock().await;
        self.cancel_loop();
        let event = engine.reset()?;
        drop(engine);
        self.publish(event.clone());
        Some(event)
    }

    /// Apply a settings change through the engine's running gate.
    pub async fn update_config(&self, f: impl FnOnce(&mut TimerConfig)) -> ConfigUpdate {
        self.engine.lock().await.update_config(f)
    }

    /// Replace the whole config through the engine's running gate.
    ///
    /// # Errors
    /// Returns [`crate::CoreError::Validation`] if `config` is out of range.
    pub async fn set_config(&self, config: TimerConfig) -> Result<ConfigUpdate> {
        Ok(self.engine.lock().await.set_config(config)?)
    }

    /// Stop ticking for good. Also called on drop.
    pub fn shutdown(&self) {
        self.cancel_loop();
    }

    fn publish(&self, event: Event) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn cancel_loop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }

    fn spawn_loop(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let engine = Arc::clone(&self.engine);
        let events = self.events.clone();
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut engine = engine.lock().await;
                if current.load(Ordering::SeqCst) != generation {
                    debug!(generation, "stale tick dropped");
                    break;
                }
                let Some(event) = engine.tick() else {
                    continue;
                };
                let still_running = engine.is_running();
                drop(engine);
                let _ = events.send(event);
                if !still_running {
                    debug!(generation, "tick loop stopped: phase not auto-started");
                    break;
                }
            }
        });

        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = task.replace(handle) {
            old.abort();
        }
    }
}

impl Drop for TimerRunner {
    fn drop(&mut self) {
        self.cancel_loop();
    }
}
