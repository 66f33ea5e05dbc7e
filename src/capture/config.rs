//! Camera and delivery configuration.
//!
//! Device settings are applied once, in order, at connection time.
//! The minimum inter-frame interval bounds how often frames are
//! delivered downstream, independent of the device's native rate.

use crate::device::FeatureValue;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A single device feature write applied at connection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSetting {
    /// GenICam feature name (e.g. `Gain`, `PixelFormat`).
    pub name: String,
    /// Value to write.
    pub value: FeatureValue,
}

/// Configuration for one camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Device identifier as reported by discovery.
    pub device_id: String,
    /// Feature writes applied in order after connecting, before
    /// acquisition starts.
    #[serde(default)]
    pub settings: Vec<FeatureSetting>,
    /// Minimum time between delivered frames, in seconds.
    pub min_interval: f64,
    /// Number of device-side frame buffers for continuous acquisition.
    pub buffer_count: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_id: String::new(),
            settings: Vec::new(),
            min_interval: 0.1, // 10 fps delivery cap
            buffer_count: 5,
        }
    }
}

impl CameraConfig {
    /// Creates a configuration for the given device with defaults otherwise.
    pub fn for_device(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Default::default()
        }
    }

    /// Adds a feature write to the settings map, preserving order.
    pub fn with_setting(mut self, name: impl Into<String>, value: FeatureValue) -> Self {
        self.settings.push(FeatureSetting {
            name: name.into(),
            value,
        });
        self
    }

    /// Sets the minimum inter-frame interval.
    pub fn with_min_interval(mut self, seconds: f64) -> Self {
        self.min_interval = seconds;
        self
    }

    /// Returns the minimum inter-frame interval as a [`Duration`].
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs_f64(self.min_interval)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device_id.is_empty() {
            return Err(ConfigError::MissingDeviceId);
        }
        if !self.min_interval.is_finite() || self.min_interval < 0.0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.buffer_count == 0 {
            return Err(ConfigError::InvalidBufferCount);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("no device identifier configured")]
    MissingDeviceId,
    #[error("invalid minimum inter-frame interval (must be finite and >= 0)")]
    InvalidInterval,
    #[error("invalid buffer count (must be >= 1)")]
    InvalidBufferCount,
    #[error("invalid delivery queue depth (must be >= 1)")]
    InvalidQueueDepth,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

/// Frame delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Bounded handoff queue depth between the acquisition loop and
    /// the downstream consumer.
    pub queue_depth: usize,
    /// Run continuously (true) or stop after a fixed number of frames.
    pub continuous: bool,
    /// Number of frames to deliver if not continuous.
    pub frame_count: u32,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            queue_depth: 8,
            continuous: false,
            frame_count: 20,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.camera.validate()?;
        if config.delivery.queue_depth == 0 {
            return Err(ConfigError::InvalidQueueDepth);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_needs_device() {
        let config = CameraConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingDeviceId)
        ));
    }

    #[test]
    fn test_for_device_valid() {
        let config = CameraConfig::for_device("GV-CAM-01");
        assert!(config.validate().is_ok());
        assert_eq!(config.min_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_negative_interval_invalid() {
        let mut config = CameraConfig::for_device("GV-CAM-01");
        config.min_interval = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterval)
        ));
    }

    #[test]
    fn test_zero_buffer_count_invalid() {
        let mut config = CameraConfig::for_device("GV-CAM-01");
        config.buffer_count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBufferCount)
        ));
    }

    #[test]
    fn test_settings_preserve_order() {
        let config = CameraConfig::for_device("GV-CAM-01")
            .with_setting("Gain", FeatureValue::Float(1.0))
            .with_setting("PixelFormat", FeatureValue::Str("Mono16".into()));
        let names: Vec<&str> = config.settings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Gain", "PixelFormat"]);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [camera]
            device_id = "GV-CAM-01"
            min_interval = 0.5
            buffer_count = 5
            settings = [
                { name = "Gain", value = 2.0 },
                { name = "PixelFormat", value = "Mono16" },
            ]

            [delivery]
            queue_depth = 4
            continuous = false
            frame_count = 10
        "#;
        let config: FileConfig = toml::from_str(toml).expect("parse should succeed");
        assert_eq!(config.camera.device_id, "GV-CAM-01");
        assert_eq!(config.camera.settings.len(), 2);
        assert_eq!(config.delivery.queue_depth, 4);
    }
}
