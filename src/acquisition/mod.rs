//! Rate-limited frame acquisition.
//!
//! The acquisition loop pulls frames from the device's internal buffer
//! pool; the device pushes nothing. The loop's only job is to bound
//! the delivery rate to the downstream consumer, independent of the
//! device's native frame rate, without ever busy-spinning.

mod sink;
mod worker;

pub use sink::{ChannelSink, FrameSink};
pub use worker::{AcquisitionWorker, IDLE_BACKOFF, POLL_BACKOFF};
