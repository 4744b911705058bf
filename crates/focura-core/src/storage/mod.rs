mod config;

pub use config::{
    Config, DetectionConfig, NotificationsConfig, RelayConfig, ServerConfig, TimerSection,
    UiConfig,
};

use std::path::PathBuf;

/// Returns the config directory, creating it if needed.
///
/// `FOCURA_CONFIG_DIR` wins when set. Otherwise `~/.config/focura`, or
/// `~/.config/focura-dev` with `FOCURA_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("FOCURA_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCURA_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focura-dev")
            } else {
                base_dir.join("focura")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
