//! Frame data model and capture configuration.
//!
//! This module holds the frame type handed to downstream consumers and
//! the configuration describing which device to drive and how fast to
//! deliver its frames.

mod config;
mod frame;

pub use config::{CameraConfig, ConfigError, DeliveryConfig, FeatureSetting, FileConfig};
pub use frame::Frame;
