//! Game configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::media::FacingMode;

/// Top-level configuration.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Name used on the welcome, buildup and celebration cards.
    #[setters(into)]
    recipient: String,

    /// RNG seed for reproducible reveals and particles.
    #[setters(strip_option)]
    seed: Option<u64>,

    /// Delays of the automatic transitions.
    timing: TimingConfig,

    /// Camera device settings.
    camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            recipient: default_recipient(),
            seed: None,
            timing: TimingConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

#[instrument]
fn default_recipient() -> String {
    "Yağmur".to_string()
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(recipient = %config.recipient, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads the file if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Serializes the configuration back to TOML.
    #[instrument(skip(self))]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::new(format!("Failed to render config: {}", e)))
    }
}

/// Delays of the timed transitions, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct TimingConfig {
    /// Last letter revealed → "Tamamlandı" toast.
    completion_toast_ms: u64,
    /// Riddle solved → compliment card.
    advance_ms: u64,
    /// Photo overlay → buildup.
    overlay_ms: u64,
    /// Buildup continue → proposal.
    buildup_ms: u64,
    /// "Hayır" → reset to welcome.
    decline_reset_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            completion_toast_ms: 500,
            advance_ms: 1500,
            overlay_ms: 4000,
            buildup_ms: 5000,
            decline_reset_ms: 2000,
        }
    }
}

impl TimingConfig {
    /// Delay before the completion toast.
    pub fn completion_toast(&self) -> Duration {
        Duration::from_millis(self.completion_toast_ms)
    }

    /// Delay before leaving the riddle.
    pub fn advance(&self) -> Duration {
        Duration::from_millis(self.advance_ms)
    }

    /// Duration of the photo overlay.
    pub fn overlay(&self) -> Duration {
        Duration::from_millis(self.overlay_ms)
    }

    /// Duration of the buildup sub-reveal.
    pub fn buildup(&self) -> Duration {
        Duration::from_millis(self.buildup_ms)
    }

    /// Delay before a decline resets the session.
    pub fn decline_reset(&self) -> Duration {
        Duration::from_millis(self.decline_reset_ms)
    }
}

/// Settings for the still-image camera device.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct CameraConfig {
    /// Image served as the camera feed. Without one, no camera is available.
    #[setters(strip_option, into)]
    still_image: Option<PathBuf>,

    /// Direction the device reports it faces.
    facing: FacingMode,

    /// Snapshot width when the stream reports no dimensions.
    fallback_width: u32,

    /// Snapshot height when the stream reports no dimensions.
    fallback_height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            still_image: None,
            facing: FacingMode::User,
            fallback_width: 640,
            fallback_height: 480,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = GameConfig::from_toml("").expect("Empty config parses");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.recipient(), "Yağmur");
        assert_eq!(config.timing().overlay(), Duration::from_secs(4));
    }

    #[test]
    fn test_partial_timing_override() {
        let config = GameConfig::from_toml("[timing]\nbuildup_ms = 10\n").expect("Parses");
        assert_eq!(*config.timing().buildup_ms(), 10);
        assert_eq!(*config.timing().decline_reset_ms(), 2000);
    }

    #[test]
    fn test_bad_toml_reports_location() {
        let err = GameConfig::from_toml("recipient = [").unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_round_trip_keeps_camera() {
        let config = GameConfig::default()
            .with_seed(9)
            .with_camera(CameraConfig::default().with_facing(FacingMode::Environment));
        let text = config.to_toml().expect("Renders");
        assert_eq!(GameConfig::from_toml(&text).expect("Parses"), config);
    }
}
