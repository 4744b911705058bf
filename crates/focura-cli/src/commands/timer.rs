use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use focura_core::notify::{LogSink, NotificationSink, TerminalSink};
use focura_core::{Config, Dashboard, Event, TimerEngine, TimerRunner};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

use super::{block_on, print_json_line};

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in real time, printing events as JSON lines and the
    /// session stats at exit
    Run {
        /// Tick this many times faster than wall-clock seconds
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
        /// Stop after this many completed focus sessions
        #[arg(long)]
        cycles: Option<u32>,
        /// Wait for a manual start after each focus session
        #[arg(long)]
        no_auto_break: bool,
        /// Start the next focus session automatically after a break
        #[arg(long)]
        auto_session: bool,
        /// Ring the terminal bell at the end of each phase
        #[arg(long)]
        bell: bool,
    },
    /// Apply ticks to a fresh timer without waiting and print the result
    Simulate {
        /// Number of one-second ticks to apply
        #[arg(long)]
        ticks: u32,
        /// Start the timer before ticking
        #[arg(long)]
        start: bool,
    },
    /// Print the idle timer built from config as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        TimerAction::Run {
            speed,
            cycles,
            no_auto_break,
            auto_session,
            bell,
        } => {
            if !(speed.is_finite() && speed > 0.0) {
                return Err(format!("--speed must be a positive number, got {speed}").into());
            }
            let mut timer = config.timer_config();
            if no_auto_break {
                timer.auto_start_break = false;
            }
            if auto_session {
                timer.auto_start_session = true;
            }
            let sink: Arc<dyn NotificationSink> = if bell {
                Arc::new(TerminalSink)
            } else {
                Arc::new(LogSink)
            };
            let period = Duration::from_secs_f64(1.0 / speed).max(MIN_PERIOD);
            let runner = TimerRunner::with_period(TimerEngine::new(timer, sink), period);
            let dashboard = Dashboard::from_config(&config, Utc::now());
            block_on(run_live(runner, dashboard, cycles))
        }
        TimerAction::Simulate { ticks, start } => {
            let mut engine = TimerEngine::new(config.timer_config(), Arc::new(LogSink));
            if start {
                if let Some(event) = engine.start() {
                    print_json_line(&event)?;
                }
            }
            for _ in 0..ticks {
                if let Some(event) = engine.tick() {
                    print_json_line(&event)?;
                }
            }
            print_json_line(&engine.snapshot())
        }
        TimerAction::Status => {
            let engine = TimerEngine::new(config.timer_config(), Arc::new(LogSink));
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            Ok(())
        }
    }
}

/// Drive the runner until `cycles` focus sessions complete, the timer goes
/// idle waiting for a manual start, or Ctrl-C. Every event is recorded on
/// `dashboard`, whose stats are printed last.
async fn run_live(
    runner: TimerRunner,
    mut dashboard: Dashboard,
    cycles: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut events = runner.subscribe();
    if let Some(event) = runner.start().await {
        print_json_line(&event)?;
    }
    // The start event was published before we could read it back.
    let _ = events.try_recv();

    let mut completed = 0u32;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                if let Some(event) = runner.pause().await {
                    print_json_line(&event)?;
                }
                break;
            }
            received = events.recv() => {
                let event = match received {
                    Ok(event) => event,
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                };
                print_json_line(&event)?;
                dashboard.record_timer_event(&event);
                let Event::PhaseCompleted { auto_started, .. } = &event else {
                    continue;
                };
                if event.is_focus_completion() {
                    completed += 1;
                }
                if cycles.is_some_and(|n| completed >= n) {
                    info!(completed, "requested cycles finished");
                    break;
                }
                if !*auto_started {
                    info!("next phase waits for a manual start");
                    break;
                }
            }
        }
    }

    runner.shutdown();
    print_json_line(&runner.snapshot().await)?;
    print_json_line(&dashboard.stats())
}
