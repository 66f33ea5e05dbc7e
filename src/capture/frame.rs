//! Frame type representing a captured image with metadata.

use std::time::Instant;

/// A single captured frame from the camera.
///
/// Contains raw sample data along with the metadata needed for
/// downstream publishing and debugging. Frames are immutable once
/// captured; ownership passes to the frame sink on delivery.
#[derive(Clone)]
pub struct Frame {
    /// Raw mono samples, row-major.
    samples: Vec<u16>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Capture timestamp (monotonic).
    timestamp: Instant,
    /// Monotonic sequence number assigned by the device.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(samples: Vec<u16>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            samples,
            width,
            height,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// Returns a reference to the raw sample data.
    #[inline]
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of samples (width * height).
    #[inline]
    pub fn sample_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Validates that the sample buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.samples.len() == self.sample_count()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("samples", &self.samples.len())
            .finish()
    }
}
