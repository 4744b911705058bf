use std::sync::Arc;

use clap::Args;
use focura_core::detection::{self, DetectionProvider};
use focura_core::{Config, RandomDetector};
use tracing::info;

use super::block_on;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (defaults to server.bind)
    #[arg(long)]
    bind: Option<String>,
    /// Seed the mock detector for reproducible readings
    #[arg(long)]
    seed: Option<u64>,
}

pub fn run(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let bind = args.bind.unwrap_or(config.server.bind);
    let provider: Arc<dyn DetectionProvider> = match args.seed.or(config.detection.seed) {
        Some(seed) => Arc::new(RandomDetector::seeded(seed)),
        None => Arc::new(RandomDetector::from_entropy()),
    };

    block_on(async move {
        let listener = detection::bind(&bind).await?;
        println!("listening on http://{}", listener.local_addr()?);
        detection::serve(listener, provider, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}
