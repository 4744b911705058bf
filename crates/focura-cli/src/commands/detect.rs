use std::path::PathBuf;

use clap::Subcommand;
use focura_core::{Config, DetectionClient};

use super::block_on;

#[derive(Subcommand)]
pub enum DetectAction {
    /// Classify sitting posture in a frame
    Posture {
        /// Image file to upload
        #[arg(long)]
        image: PathBuf,
        /// Detection API base URL (defaults to detection.base_url)
        #[arg(long)]
        url: Option<String>,
    },
    /// Check a frame for a phone
    Phone {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        url: Option<String>,
    },
}

pub fn run(action: DetectAction) -> Result<(), Box<dyn std::error::Error>> {
    let json = block_on(async move {
        detect(action)
            .await
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    })?;
    println!("{json}");
    Ok(())
}

async fn detect(action: DetectAction) -> focura_core::error::Result<String> {
    let config = Config::load()?;
    let (image, url) = match &action {
        DetectAction::Posture { image, url } | DetectAction::Phone { image, url } => (image, url),
    };
    let bytes = std::fs::read(image).map_err(|e| {
        std::io::Error::new(e.kind(), format!("cannot read image {}: {e}", image.display()))
    })?;
    let base_url = url.clone().unwrap_or(config.detection.base_url);
    let client = DetectionClient::new(&base_url)?;

    let json = match action {
        DetectAction::Posture { .. } => {
            serde_json::to_string_pretty(&client.detect_posture(bytes).await?)?
        }
        DetectAction::Phone { .. } => {
            serde_json::to_string_pretty(&client.detect_phone(bytes).await?)?
        }
    };
    Ok(json)
}
