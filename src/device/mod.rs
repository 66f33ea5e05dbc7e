//! Device SDK boundary.
//!
//! Discovery, session handles, feature values, and the mock
//! implementation used by tests and the demo binary. The vendor wire
//! protocol is out of scope; everything here is the interface the
//! lifecycle controller drives.

pub mod features;
mod mock;
mod sdk;

pub use mock::{MockHandle, MockSdk};
pub use sdk::{CameraError, CameraSdk, DeviceHandle, FeatureValue};
