//! GenICam Video Camera Library
//!
//! Lifecycle management and rate-limited continuous frame acquisition
//! for a single GenICam network camera, feeding a downstream image
//! consumer.
//!
//! # Architecture
//!
//! The system follows an explicit flow:
//!
//! ```text
//! controller ──owns──▶ device handle ──frames──▶ acquisition loop ──▶ sink
//!      ▲                                              │
//!      └──────── exclusion domain (one mutex) ────────┘
//! ```
//!
//! # Design Principles
//!
//! - **One handle, one lock**: at most one live device session exists,
//!   and every access to it (lifecycle, exposure, frame pull) is
//!   serialized under the controller's mutex
//! - **Pull, don't push**: the device buffers frames internally; the
//!   acquisition loop bounds the *delivery* rate downstream
//! - **Transient is not an error**: "no frame yet" and "too soon" are
//!   retry signals consumed inside the loop, never surfaced
//! - **Fail back to closed**: any activation failure rolls back to the
//!   no-handle state, ready for a retry
//!
//! # Example
//!
//! ```no_run
//! use genicam_video::{
//!     capture::CameraConfig,
//!     device::{FeatureValue, MockSdk},
//!     VideoCamera,
//! };
//!
//! let config = CameraConfig::for_device("mock-cam-0")
//!     .with_setting("Gain", FeatureValue::Float(2.0))
//!     .with_min_interval(0.1);
//!
//! let mut camera = VideoCamera::new(MockSdk::new(), config, |frame: genicam_video::Frame| {
//!     println!("frame {} ({}x{})", frame.sequence(), frame.width(), frame.height());
//! })
//! .unwrap();
//!
//! camera.open().unwrap();
//! camera.set_exposure_time(0.05).unwrap();
//!
//! std::thread::sleep(std::time::Duration::from_secs(1));
//! camera.close();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod acquisition;
pub mod capture;
pub mod control;
pub mod device;
mod video;

// Re-export commonly used types at crate root
pub use acquisition::{AcquisitionWorker, ChannelSink, FrameSink};
pub use capture::{CameraConfig, FeatureSetting, FileConfig, Frame};
pub use control::CameraController;
pub use device::{CameraError, CameraSdk, DeviceHandle, FeatureValue, MockSdk};
pub use video::VideoCamera;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
