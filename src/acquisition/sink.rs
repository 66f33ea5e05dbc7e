//! Frame delivery to the downstream consumer.

use crate::capture::Frame;
use std::sync::mpsc::{Receiver, SyncSender, TrySendError};

/// Receives captured frames, in capture order.
///
/// `deliver` must return promptly; the acquisition loop hands off and
/// moves on, it never waits out a slow consumer.
pub trait FrameSink: Send {
    /// Accepts one frame. Ownership transfers to the sink.
    fn deliver(&mut self, frame: Frame);
}

impl<F: FnMut(Frame) + Send> FrameSink for F {
    fn deliver(&mut self, frame: Frame) {
        self(frame)
    }
}

/// Bounded channel handoff to a consumer on another thread.
///
/// When the consumer falls behind and the queue fills up, new frames
/// are dropped with a warning instead of blocking the acquisition
/// loop. Frames that are delivered stay in capture order.
pub struct ChannelSink {
    tx: SyncSender<Frame>,
    dropped: u64,
}

impl ChannelSink {
    /// Creates a sink and its receiving end with the given queue depth.
    pub fn bounded(depth: usize) -> (Self, Receiver<Frame>) {
        let (tx, rx) = std::sync::mpsc::sync_channel(depth);
        (Self { tx, dropped: 0 }, rx)
    }

    /// Returns how many frames were dropped on a full queue.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl FrameSink for ChannelSink {
    fn deliver(&mut self, frame: Frame) {
        match self.tx.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(frame)) => {
                self.dropped += 1;
                tracing::warn!(
                    sequence = frame.sequence(),
                    dropped_total = self.dropped,
                    "Consumer queue full, dropping frame"
                );
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("Consumer disconnected, dropping frame");
            }
        }
    }
}
