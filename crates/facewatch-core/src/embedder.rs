//! Seam for the external face detection + embedding backend.

use crate::frame::Frame;
use crate::types::ProbeFace;

/// Produces located, embedded faces from a frame.
///
/// Implementations wrap whatever backend the host runs — an ONNX pipeline,
/// a remote service, a test stub. Backends are commonly stateful, hence
/// `&mut self`.
pub trait FaceEmbedder: Send {
    /// Detect every face in `frame` and return its location and embedding.
    ///
    /// An empty vec means "no faces here". Backend trouble that should abort
    /// the session is the host's concern, not this seam's.
    fn embed(&mut self, frame: &Frame) -> Vec<ProbeFace>;
}
