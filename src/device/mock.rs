//! Mock SDK implementation for testing and demos without hardware.

use super::sdk::{CameraError, CameraSdk, DeviceHandle, FeatureValue};
use crate::capture::Frame;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

const MOCK_WIDTH: u32 = 64;
const MOCK_HEIGHT: u32 = 48;

/// Shared record of every SDK call, inspectable after the handle has
/// been consumed by the controller.
type CallLog = Arc<Mutex<Vec<String>>>;

fn push_log(log: &CallLog, entry: String) {
    log.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(entry);
}

/// Mock SDK producing synthetic frames at a configurable period.
///
/// Clones share the call log and the rejection state, so a test can
/// keep a clone to inspect or reconfigure the mock after handing the
/// original to a controller.
#[derive(Debug, Clone)]
pub struct MockSdk {
    devices: Vec<String>,
    frame_period: Duration,
    reject_feature: Arc<Mutex<Option<String>>>,
    log: CallLog,
}

impl Default for MockSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSdk {
    /// Creates a mock SDK exposing a single device, `mock-cam-0`,
    /// producing a frame every millisecond once acquiring.
    pub fn new() -> Self {
        Self {
            devices: vec!["mock-cam-0".to_owned()],
            frame_period: Duration::from_millis(1),
            reject_feature: Arc::new(Mutex::new(None)),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the discoverable device identifiers.
    pub fn with_devices(mut self, devices: Vec<String>) -> Self {
        self.devices = devices;
        self
    }

    /// Sets how often the mock device produces a frame.
    pub fn with_frame_period(mut self, period: Duration) -> Self {
        self.frame_period = period;
        self
    }

    /// Makes every write to the named feature fail.
    pub fn rejecting_feature(self, name: impl Into<String>) -> Self {
        *self
            .reject_feature
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(name.into());
        self
    }

    /// Stops rejecting feature writes.
    pub fn accept_all_features(&self) {
        *self
            .reject_feature
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns a snapshot of all recorded SDK calls.
    pub fn calls(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CameraSdk for MockSdk {
    type Handle = MockHandle;

    fn list_device_ids(&self) -> Vec<String> {
        self.devices.clone()
    }

    fn open(&self, device_id: &str) -> Result<Self::Handle, CameraError> {
        push_log(&self.log, format!("open:{device_id}"));
        if !self.devices.iter().any(|d| d == device_id) {
            return Err(CameraError::OpenFailed(format!(
                "no such device: {device_id}"
            )));
        }
        tracing::info!(device = device_id, "MockSdk opened device");
        Ok(MockHandle {
            features: HashMap::new(),
            reject_feature: Arc::clone(&self.reject_feature),
            log: Arc::clone(&self.log),
            acquiring: false,
            frame_period: self.frame_period,
            next_frame_at: Instant::now(),
            sequence: 0,
        })
    }
}

/// Mock device session backing [`MockSdk`].
#[derive(Debug)]
pub struct MockHandle {
    features: HashMap<String, FeatureValue>,
    reject_feature: Arc<Mutex<Option<String>>>,
    log: CallLog,
    acquiring: bool,
    frame_period: Duration,
    next_frame_at: Instant,
    sequence: u64,
}

impl DeviceHandle for MockHandle {
    fn set_feature(&mut self, name: &str, value: FeatureValue) -> Result<(), CameraError> {
        push_log(&self.log, format!("set_feature:{name}={value}"));
        let rejected = self
            .reject_feature
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if rejected.as_deref() == Some(name) {
            return Err(CameraError::FeatureWrite {
                name: name.to_owned(),
                reason: "rejected by mock".to_owned(),
            });
        }
        self.features.insert(name.to_owned(), value);
        Ok(())
    }

    fn get_feature(&self, name: &str) -> Result<FeatureValue, CameraError> {
        push_log(&self.log, format!("get_feature:{name}"));
        self.features
            .get(name)
            .cloned()
            .ok_or_else(|| CameraError::FeatureRead {
                name: name.to_owned(),
                reason: "feature never written".to_owned(),
            })
    }

    fn start_acquisition(&mut self, buffer_count: u32) -> Result<(), CameraError> {
        push_log(&self.log, format!("start_acquisition:{buffer_count}"));
        self.acquiring = true;
        self.next_frame_at = Instant::now();
        Ok(())
    }

    fn stop_acquisition(&mut self) {
        push_log(&self.log, "stop_acquisition".to_owned());
        self.acquiring = false;
    }

    fn try_pop_frame(&mut self) -> Option<Frame> {
        if !self.acquiring || Instant::now() < self.next_frame_at {
            return None;
        }

        // Deterministic gradient mixed with the sequence number,
        // only for exercising frame handling.
        let count = (MOCK_WIDTH * MOCK_HEIGHT) as usize;
        let samples: Vec<u16> = (0..count)
            .map(|i| ((i as u64 ^ self.sequence) % 4096) as u16)
            .collect();

        self.sequence += 1;
        self.next_frame_at = Instant::now() + self.frame_period;
        Some(Frame::new(samples, MOCK_WIDTH, MOCK_HEIGHT, self.sequence))
    }

    fn shutdown(&mut self) {
        push_log(&self.log, "shutdown".to_owned());
        self.acquiring = false;
        tracing::info!("MockHandle shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_unknown_device_fails() {
        let sdk = MockSdk::new();
        assert!(matches!(
            sdk.open("nonexistent-cam"),
            Err(CameraError::OpenFailed(_))
        ));
    }

    #[test]
    fn test_feature_round_trip() {
        let sdk = MockSdk::new();
        let mut handle = sdk.open("mock-cam-0").expect("open should succeed");

        handle
            .set_feature("Gain", FeatureValue::Float(2.0))
            .expect("set should succeed");
        assert_eq!(
            handle.get_feature("Gain").expect("get should succeed"),
            FeatureValue::Float(2.0)
        );
    }

    #[test]
    fn test_rejected_feature_write() {
        let sdk = MockSdk::new().rejecting_feature("Gain");
        let mut handle = sdk.open("mock-cam-0").expect("open should succeed");

        assert!(matches!(
            handle.set_feature("Gain", FeatureValue::Float(2.0)),
            Err(CameraError::FeatureWrite { .. })
        ));
    }

    #[test]
    fn test_no_frames_before_acquisition() {
        let sdk = MockSdk::new();
        let mut handle = sdk.open("mock-cam-0").expect("open should succeed");

        assert!(handle.try_pop_frame().is_none());

        handle.start_acquisition(5).expect("start should succeed");
        let frame = handle.try_pop_frame().expect("frame should be ready");
        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 1);

        handle.stop_acquisition();
        assert!(handle.try_pop_frame().is_none());
    }

    #[test]
    fn test_call_log_records_order() {
        let sdk = MockSdk::new();
        let mut handle = sdk.open("mock-cam-0").expect("open should succeed");
        handle
            .set_feature("Gain", FeatureValue::Int(1))
            .expect("set should succeed");
        handle.shutdown();

        assert_eq!(
            sdk.calls(),
            ["open:mock-cam-0", "set_feature:Gain=1", "shutdown"]
        );
    }
}
