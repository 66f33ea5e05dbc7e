//! Camera lifecycle and exposure control.

mod controller;

pub use controller::{CameraController, MICROS_PER_SECOND};
