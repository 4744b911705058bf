//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Timer lengths and automation flags
//! - Notification preferences
//! - Theme selection
//! - Relay channel names
//! - Detection and server endpoints
//!
//! Configuration is stored at `~/.config/focura/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::data_dir;
use crate::context::{DashboardContext, Theme, TimerTheme};
use crate::error::ConfigError;
use crate::timer::TimerConfig;

/// Timer section; lengths in minutes as shown on the sliders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSection {
    #[serde(default = "default_session_min")]
    pub session_min: u32,
    #[serde(default = "default_break_min")]
    pub break_min: u32,
    #[serde(default = "default_long_break_min")]
    pub long_break_min: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default = "default_true")]
    pub auto_start_break: bool,
    #[serde(default)]
    pub auto_start_session: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default)]
    pub vibration: bool,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Minimum minutes between two posture alert toasts (5-120).
    #[serde(default = "default_interval_min")]
    pub interval_min: u32,
    #[serde(default = "default_true")]
    pub posture_alerts: bool,
    #[serde(default = "default_hydration_interval_min")]
    pub hydration_interval_min: u32,
}

/// UI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub timer_theme: TimerTheme,
}

/// Real-time relay channel names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_event")]
    pub event: String,
    #[serde(default = "default_posture_channel")]
    pub posture_channel: String,
    #[serde(default = "default_posture_event")]
    pub posture_event: String,
}

/// Detection client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Fixed seed for the mock detector; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Mock detection server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focura/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerSection,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

// Default functions
fn default_session_min() -> u32 {
    25
}
fn default_break_min() -> u32 {
    5
}
fn default_long_break_min() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_interval_min() -> u32 {
    30
}
fn default_hydration_interval_min() -> u32 {
    120
}
fn default_channel() -> String {
    "my-channel".into()
}
fn default_event() -> String {
    "my-event".into()
}
fn default_posture_channel() -> String {
    "logs".into()
}
fn default_posture_event() -> String {
    "bad_posture".into()
}
fn default_base_url() -> String {
    "http://127.0.0.1:3000".into()
}
fn default_bind() -> String {
    "127.0.0.1:3000".into()
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            session_min: default_session_min(),
            break_min: default_break_min(),
            long_break_min: default_long_break_min(),
            sessions_before_long_break: default_sessions_before_long_break(),
            auto_start_break: true,
            auto_start_session: false,
            sound: true,
            vibration: false,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            interval_min: default_interval_min(),
            posture_alerts: true,
            hydration_interval_min: default_hydration_interval_min(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            event: default_event(),
            posture_channel: default_posture_channel(),
            posture_event: default_posture_event(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            seed: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    // Optional numbers (e.g. detection.seed) serialize as null
                    // and may be cleared again; required ones fail to deserialize.
                    serde_json::Value::Number(_) | serde_json::Value::Null => match value {
                        "" | "none" => serde_json::Value::Null,
                        v => serde_json::Value::Number(
                            v.parse::<u64>()
                                .map_err(|_| invalid(format!("cannot parse '{v}' as number")))?
                                .into(),
                        ),
                    },
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    ///
    /// # Errors
    /// Fails if the data directory cannot be created.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/focura"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default path, writing defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                debug!(path = %path.display(), "config loaded");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                info!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default path.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check ranges the sliders enforce.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timer;
        let checks = [
            ("timer.session_min", t.session_min, crate::timer::SESSION_MINUTES),
            ("timer.break_min", t.break_min, crate::timer::BREAK_MINUTES),
            ("timer.long_break_min", t.long_break_min, crate::timer::LONG_BREAK_MINUTES),
            (
                "timer.sessions_before_long_break",
                t.sessions_before_long_break,
                crate::timer::SESSIONS_BEFORE_LONG_BREAK,
            ),
            ("notifications.interval_min", self.notifications.interval_min, 5..=120),
            (
                "notifications.hydration_interval_min",
                self.notifications.hydration_interval_min,
                1..=24 * 60,
            ),
        ];
        for (key, value, range) in checks {
            if !range.contains(&value) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!(
                        "must be between {} and {}, got {value}",
                        range.start(),
                        range.end()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Timer settings, clamped into range.
    pub fn timer_config(&self) -> TimerConfig {
        let t = &self.timer;
        let mut cfg = TimerConfig::from_minutes(
            t.session_min,
            t.break_min,
            t.long_break_min,
            t.sessions_before_long_break,
        )
        .with_auto_start(t.auto_start_break, t.auto_start_session);
        cfg.sound_on = t.sound;
        cfg.vibration_on = t.vibration;
        cfg
    }

    pub fn dashboard_context(&self) -> DashboardContext {
        DashboardContext::new(self.ui.theme, self.ui.timer_theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.session_min, 25);
        assert_eq!(parsed.relay.channel, "my-channel");
        assert_eq!(parsed.ui.theme, Theme::Light);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nsession_min = 50\n").unwrap();
        assert_eq!(parsed.timer.session_min, 50);
        assert_eq!(parsed.timer.break_min, 5);
        assert!(parsed.timer.auto_start_break);
        assert_eq!(parsed.relay.posture_event, "bad_posture");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.session_min").as_deref(), Some("25"));
        assert_eq!(cfg.get("ui.timer_theme").as_deref(), Some("default"));
        assert_eq!(cfg.get("detection.seed").as_deref(), Some("null"));
        assert!(cfg.get("ui.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("timer.auto_start_session", "true").unwrap();
        cfg.set("timer.break_min", "10").unwrap();
        cfg.set("ui.theme", "dark").unwrap();
        cfg.set("detection.seed", "42").unwrap();
        assert!(cfg.timer.auto_start_session);
        assert_eq!(cfg.timer.break_min, 10);
        assert_eq!(cfg.ui.theme, Theme::Dark);
        assert_eq!(cfg.detection.seed, Some(42));
    }

    #[test]
    fn optional_seed_can_be_cleared() {
        let mut cfg = Config::default();
        cfg.set("detection.seed", "7").unwrap();
        assert_eq!(cfg.get("detection.seed").as_deref(), Some("7"));
        cfg.set("detection.seed", "none").unwrap();
        assert_eq!(cfg.detection.seed, None);
        cfg.set("detection.seed", "9").unwrap();
        cfg.set("detection.seed", "").unwrap();
        assert_eq!(cfg.detection.seed, None);
    }

    #[test]
    fn required_number_cannot_be_cleared() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timer.session_min", "none"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.timer.session_min, 25);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timer.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("timer.sound", "loud").is_err());
        assert!(cfg.set("ui.theme", "purple").is_err());
        assert_eq!(cfg.ui.theme, Theme::Light);
    }

    #[test]
    fn set_rejects_out_of_range() {
        let mut cfg = Config::default();
        let err = cfg.set("timer.session_min", "120").unwrap_err();
        assert!(err.to_string().contains("timer.session_min"));
        assert_eq!(cfg.timer.session_min, 25);
    }

    #[test]
    fn timer_config_clamps_hand_edited_values() {
        let cfg: Config = toml::from_str("[timer]\nsession_min = 200\nsound = false\n").unwrap();
        let timer = cfg.timer_config();
        assert_eq!(timer.session_length_secs, 90 * 60);
        assert!(!timer.sound_on);
        assert!(timer.validate().is_ok());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer.session_min, 25);
        assert!(path.exists());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("relay.channel", "wellness").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.relay.channel, "wellness");
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
