//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default interactive-element selector, matching the markers a typical
/// page treats as clickable.
pub const DEFAULT_INTERACTIVE_SELECTOR: &str = "a, button, input[type=\"button\"], \
     input[type=\"submit\"], select, textarea, [role=\"button\"], \
     [data-cursor=\"pointer\"], [href], .cursor-pointer, summary, label";

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default follower settings.
    pub follower: FollowerDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default follower parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerDefaults {
    /// Per-frame smoothing factor in (0, 1). Larger values track tighter.
    pub smoothing_factor: f64,

    /// Selector list deciding which elements count as interactive.
    pub interactive_selector: String,

    /// Render loop rate (Hz).
    pub frame_rate_hz: u32,

    /// Nominal pointer sampling rate recorded in trace headers (Hz).
    pub pointer_sample_rate_hz: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "glidecursor=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            follower: FollowerDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FollowerDefaults {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.18,
            interactive_selector: DEFAULT_INTERACTIVE_SELECTOR.to_string(),
            frame_rate_hz: 60,
            pointer_sample_rate_hz: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("glidecursor").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = AppConfig::default();
        assert!(config.follower.smoothing_factor > 0.0);
        assert!(config.follower.smoothing_factor < 1.0);
        assert!(config.follower.frame_rate_hz > 0);
        assert!(config
            .follower
            .interactive_selector
            .contains("[data-cursor=\"pointer\"]"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.follower.smoothing_factor,
            config.follower.smoothing_factor
        );
        assert_eq!(parsed.logging.level, config.logging.level);
    }
}
