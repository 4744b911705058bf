use std::sync::{Arc, Mutex};

use chrono::Utc;
use clap::Subcommand;
use focura_core::{attach, attach_posture, Config, Dashboard, LocalRelay};
use tokio::sync::mpsc;

use super::{block_on, print_json_line};

const DEMO_ALERTS: [&str; 2] = ["drink water", "stretch your legs"];
const DEMO_POSTURE_LOG: &str = "Bad posture detected: neck angle 38deg";

#[derive(Subcommand)]
pub enum RelayAction {
    /// Publish sample alerts and a posture log line through an in-process
    /// relay, then print the toasts and session stats
    Demo,
}

pub fn run(action: RelayAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RelayAction::Demo => demo(Config::load()?),
    }
}

fn demo(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    block_on(async move {
        let relay = LocalRelay::new();
        let dashboard = Arc::new(Mutex::new(Dashboard::from_config(&config, Utc::now())));
        let (tx, mut toasts) = mpsc::unbounded_channel();
        let posture_tx = tx.clone();
        let alerts = attach(
            Arc::clone(&dashboard),
            &relay,
            &config.relay.channel,
            &config.relay.event,
            move |toast| {
                let _ = tx.send(toast);
            },
        );
        let posture = attach_posture(
            Arc::clone(&dashboard),
            &relay,
            &config.relay.posture_channel,
            &config.relay.posture_event,
            move |toast| {
                let _ = posture_tx.send(toast);
            },
        );

        for message in DEMO_ALERTS {
            relay.publish_message(&config.relay.channel, &config.relay.event, message);
        }
        relay.publish_message(
            &config.relay.posture_channel,
            &config.relay.posture_event,
            DEMO_POSTURE_LOG,
        );
        relay.disconnect();
        alerts.await?;
        posture.await?;

        while let Some(toast) = toasts.recv().await {
            print_json_line(&toast)?;
        }

        let stats = dashboard
            .lock()
            .map_err(|_| "dashboard lock poisoned")?
            .stats();
        print_json_line(&stats)
    })
}
