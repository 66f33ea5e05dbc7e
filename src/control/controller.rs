//! Camera lifecycle controller.
//!
//! Owns the one live device handle and the mutex that serializes every
//! device-touching call against the acquisition loop. All power,
//! acquisition, and feature state on the device changes through this
//! type only.

use crate::capture::{CameraConfig, Frame};
use crate::device::{features, CameraError, CameraSdk, DeviceHandle, FeatureValue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Conversion factor between the public exposure contract (seconds)
/// and the device contract (microseconds).
pub const MICROS_PER_SECOND: f64 = 1e6;

/// Lifecycle controller for a single camera.
///
/// At most one live handle exists at any instant. `activate` on an
/// already-open camera closes the handle first and reconnects; two
/// live handles never coexist.
pub struct CameraController<S: CameraSdk> {
    sdk: S,
    config: CameraConfig,
    /// The exclusion domain. Every handle access goes through this
    /// mutex; the handle is never cached outside it.
    handle: Mutex<Option<S::Handle>>,
    /// Whether acquisition is allowed; read each cycle by the
    /// acquisition loop.
    active: AtomicBool,
}

impl<S: CameraSdk> CameraController<S> {
    /// Creates a controller for the device named in `config`.
    ///
    /// No device session is created until [`CameraController::open`]
    /// or [`CameraController::activate`] is called.
    pub fn new(sdk: S, config: CameraConfig) -> Self {
        Self {
            sdk,
            config,
            handle: Mutex::new(None),
            active: AtomicBool::new(false),
        }
    }

    /// Returns the configuration this controller was built with.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Returns true while a handle exists and acquisition is allowed.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    // A poisoned mutex only means another thread panicked while
    // holding it; the Option inside is still consistent, so recover
    // the guard rather than propagating the poison.
    fn lock_handle(&self) -> MutexGuard<'_, Option<S::Handle>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validates the configured device against discovery, then
    /// connects to it.
    ///
    /// An identifier absent from the discovery list is a fatal
    /// configuration error, not retried.
    pub fn open(&self) -> Result<(), CameraError> {
        let ids = self.sdk.list_device_ids();
        if !ids.iter().any(|id| id == &self.config.device_id) {
            tracing::error!(
                device = %self.config.device_id,
                available = ids.len(),
                "Configured device not found in discovery list"
            );
            return Err(CameraError::DeviceNotFound(self.config.device_id.clone()));
        }
        self.activate()
    }

    /// Connects to the device, applies all configured settings in
    /// order, and starts continuous acquisition.
    ///
    /// An already-open handle is closed first. On any failure the
    /// controller rolls back to the no-handle state; callers may retry
    /// by calling `activate` again.
    pub fn activate(&self) -> Result<(), CameraError> {
        let mut guard = self.lock_handle();
        Self::close_handle(&mut guard);
        match self.connect(&mut guard) {
            Ok(()) => {
                self.active.store(true, Ordering::Release);
                Ok(())
            }
            Err(e) => {
                self.active.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    /// Stops acquisition and shuts the handle down.
    ///
    /// A no-op when no handle exists; safe to call repeatedly and
    /// after a failed `activate`.
    pub fn deactivate(&self) {
        let mut guard = self.lock_handle();
        self.active.store(false, Ordering::Release);
        Self::close_handle(&mut guard);
    }

    /// Alias for [`CameraController::deactivate`]; same idempotent
    /// contract.
    pub fn close(&self) {
        self.deactivate();
    }

    fn connect(&self, guard: &mut Option<S::Handle>) -> Result<(), CameraError> {
        tracing::info!(device = %self.config.device_id, "Connecting to camera...");
        let mut handle = self.sdk.open(&self.config.device_id)?;
        tracing::info!("Connected.");

        for setting in &self.config.settings {
            tracing::info!(name = %setting.name, value = %setting.value, "Setting value...");
            if let Err(e) = handle.set_feature(&setting.name, setting.value.clone()) {
                handle.shutdown();
                return Err(CameraError::OpenFailed(e.to_string()));
            }
        }

        if let Err(e) = handle.start_acquisition(self.config.buffer_count) {
            handle.shutdown();
            return Err(CameraError::OpenFailed(e.to_string()));
        }

        *guard = Some(handle);
        Ok(())
    }

    fn close_handle(guard: &mut Option<S::Handle>) {
        if let Some(mut handle) = guard.take() {
            tracing::info!("Closing camera...");
            handle.stop_acquisition();
            handle.shutdown();
        }
    }

    /// Pulls the next buffered frame under the exclusion domain.
    ///
    /// Returns `None` both when no frame is ready and when no handle
    /// exists; either way the caller retries later.
    pub fn try_pop_frame(&self) -> Option<Frame> {
        let mut guard = self.lock_handle();
        guard.as_mut()?.try_pop_frame()
    }

    /// Activates the camera unless it already is.
    ///
    /// Unlike `activate`, a live handle is left untouched; this is the
    /// lazy-activation path used by the exposure controls.
    pub fn ensure_active(&self) -> Result<(), CameraError> {
        {
            let guard = self.lock_handle();
            if guard.is_some() && self.is_active() {
                return Ok(());
            }
        }
        self.activate()
    }

    /// Sets the exposure time, in seconds.
    ///
    /// Activates the camera first if necessary. The device sees
    /// microseconds.
    pub fn set_exposure_time(&self, seconds: f64) -> Result<(), CameraError> {
        self.ensure_active()?;
        let mut guard = self.lock_handle();
        let handle = guard.as_mut().ok_or(CameraError::NotConnected)?;
        handle.set_feature(
            features::EXPOSURE_TIME,
            FeatureValue::Float(seconds * MICROS_PER_SECOND),
        )
    }

    /// Returns the exposure time, in seconds.
    ///
    /// Activates the camera first if necessary.
    pub fn get_exposure_time(&self) -> Result<f64, CameraError> {
        self.ensure_active()?;
        let guard = self.lock_handle();
        let handle = guard.as_ref().ok_or(CameraError::NotConnected)?;
        let value = handle.get_feature(features::EXPOSURE_TIME)?;
        let micros = value.as_f64().ok_or_else(|| CameraError::FeatureRead {
            name: features::EXPOSURE_TIME.to_owned(),
            reason: format!("non-numeric value: {value}"),
        })?;
        Ok(micros / MICROS_PER_SECOND)
    }
}
