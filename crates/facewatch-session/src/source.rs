//! Seam for the external frame acquisition backend.

use facewatch_core::Frame;
use thiserror::Error;

/// Why the source produced no frame.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The stream ended and cannot be restarted.
    #[error("frame source exhausted")]
    Exhausted,
    /// The capture device failed.
    #[error("frame capture failed: {0}")]
    Capture(String),
}

/// A lazy, non-restartable sequence of frames.
///
/// Implementations wrap a camera, a video file, a test script. The running
/// session owns its source exclusively and drops it on stop or failure —
/// releasing the device.
pub trait FrameSource: Send {
    /// Produce the next frame. Any error is fatal to the session.
    fn next_frame(&mut self) -> Result<Frame, SourceError>;
}
