//! Top-level video camera module.
//!
//! Wires the lifecycle controller and the acquisition loop together
//! behind the surface the surrounding framework sees: open, close,
//! activate/deactivate, and the exposure controls.

use crate::acquisition::{AcquisitionWorker, FrameSink};
use crate::capture::{CameraConfig, ConfigError};
use crate::control::CameraController;
use crate::device::{CameraError, CameraSdk};
use std::sync::Arc;

/// A continuously-acquiring video camera.
///
/// The acquisition thread starts at construction and idles until the
/// camera is activated. [`close`] stops the thread first and then
/// shuts the device down, in that order, so no device-touching code
/// runs after it returns; `Drop` does the same as a backstop.
///
/// [`close`]: VideoCamera::close
pub struct VideoCamera<S: CameraSdk + 'static> {
    controller: Arc<CameraController<S>>,
    worker: Option<AcquisitionWorker>,
}

impl<S: CameraSdk + 'static> VideoCamera<S> {
    /// Creates the module and starts its acquisition thread.
    ///
    /// The camera itself stays untouched until [`VideoCamera::open`].
    pub fn new(
        sdk: S,
        config: CameraConfig,
        sink: impl FrameSink + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = Arc::new(CameraController::new(sdk, config));
        let worker = AcquisitionWorker::spawn(Arc::clone(&controller), sink);
        Ok(Self {
            controller,
            worker: Some(worker),
        })
    }

    /// Returns the lifecycle controller, shared with the acquisition
    /// thread.
    pub fn controller(&self) -> &Arc<CameraController<S>> {
        &self.controller
    }

    /// Validates the configured device against discovery and connects.
    pub fn open(&self) -> Result<(), CameraError> {
        self.controller.open()
    }

    /// Reconnects to the device; see [`CameraController::activate`].
    pub fn activate(&self) -> Result<(), CameraError> {
        self.controller.activate()
    }

    /// Releases the device without stopping the acquisition thread;
    /// the thread idles until the next activation.
    pub fn deactivate(&self) {
        self.controller.deactivate();
    }

    /// Sets the exposure time in seconds, activating lazily.
    pub fn set_exposure_time(&self, seconds: f64) -> Result<(), CameraError> {
        self.controller.set_exposure_time(seconds)
    }

    /// Returns the exposure time in seconds, activating lazily.
    pub fn get_exposure_time(&self) -> Result<f64, CameraError> {
        self.controller.get_exposure_time()
    }

    /// Stops the acquisition thread, then closes the device.
    ///
    /// Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.stop();
        }
        self.controller.close();
    }
}

impl<S: CameraSdk + 'static> Drop for VideoCamera<S> {
    fn drop(&mut self) {
        self.close();
    }
}
