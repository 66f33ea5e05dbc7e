//! Standard Feature Naming Convention (SFNC) names used by this crate.

/// Exposure time feature name (`ExposureTime`), in microseconds.
pub const EXPOSURE_TIME: &str = "ExposureTime";
/// Gain feature name (`Gain`).
pub const GAIN: &str = "Gain";
/// Pixel format feature name (`PixelFormat`).
pub const PIXEL_FORMAT: &str = "PixelFormat";
