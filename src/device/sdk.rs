//! Camera SDK abstraction.
//!
//! This module defines the boundary to the vendor camera SDK as a pair
//! of traits: discovery plus session opening, and the per-session
//! device handle. The register-level wire protocol lives entirely
//! behind these traits.

use crate::capture::Frame;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during device operations.
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    #[error("device not found in discovery list: {0}")]
    DeviceNotFound(String),
    #[error("failed to open device: {0}")]
    OpenFailed(String),
    #[error("failed to write feature {name}: {reason}")]
    FeatureWrite { name: String, reason: String },
    #[error("failed to read feature {name}: {reason}")]
    FeatureRead { name: String, reason: String },
    #[error("device not connected")]
    NotConnected,
}

/// A value carried by a named device feature.
///
/// GenICam features are typed; the settings map and the exposure
/// controls only ever need these four shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Boolean feature.
    Bool(bool),
    /// Integer feature.
    Int(i64),
    /// Floating-point feature.
    Float(f64),
    /// Enumeration or string feature.
    Str(String),
}

impl FeatureValue {
    /// Returns the numeric value, widening integers to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

/// An open device session.
///
/// Exactly one handle per physical device exists at a time; the
/// lifecycle controller owns it and serializes every call below under
/// its exclusion domain. Implementations need not be internally
/// thread-safe.
pub trait DeviceHandle: Send {
    /// Writes a named feature on the device.
    fn set_feature(&mut self, name: &str, value: FeatureValue) -> Result<(), CameraError>;

    /// Reads a named feature from the device.
    fn get_feature(&self, name: &str) -> Result<FeatureValue, CameraError>;

    /// Starts continuous acquisition with the given buffer pool depth.
    fn start_acquisition(&mut self, buffer_count: u32) -> Result<(), CameraError>;

    /// Stops continuous acquisition.
    fn stop_acquisition(&mut self);

    /// Pulls the next buffered frame, if one is ready (non-blocking).
    fn try_pop_frame(&mut self) -> Option<Frame>;

    /// Releases the device session.
    fn shutdown(&mut self);
}

/// Device discovery and session creation.
pub trait CameraSdk: Send + Sync {
    /// The handle type produced by [`CameraSdk::open`].
    type Handle: DeviceHandle;

    /// Lists the identifiers of all currently discoverable devices.
    fn list_device_ids(&self) -> Vec<String>;

    /// Opens a session for the given device.
    fn open(&self, device_id: &str) -> Result<Self::Handle, CameraError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_value_as_f64() {
        assert_eq!(FeatureValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(FeatureValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(FeatureValue::Str("Mono16".into()).as_f64(), None);
        assert_eq!(FeatureValue::Bool(true).as_f64(), None);
    }

    #[test]
    fn test_feature_value_toml_shapes() {
        #[derive(serde::Deserialize)]
        struct Row {
            value: FeatureValue,
        }
        let int: Row = toml::from_str("value = 2").expect("int");
        assert_eq!(int.value, FeatureValue::Int(2));
        let float: Row = toml::from_str("value = 2.5").expect("float");
        assert_eq!(float.value, FeatureValue::Float(2.5));
        let string: Row = toml::from_str("value = \"Mono16\"").expect("str");
        assert_eq!(string.value, FeatureValue::Str("Mono16".into()));
        let boolean: Row = toml::from_str("value = true").expect("bool");
        assert_eq!(boolean.value, FeatureValue::Bool(true));
    }
}
