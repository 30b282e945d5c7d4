//! facewatch-session — the recognition loop and its host seams.
//!
//! Wires a frame source, an embedding backend, the matcher, and the stores
//! into a tick-driven session a host can drive directly or run on a worker
//! thread.

pub mod annotate;
pub mod config;
pub mod presenter;
pub mod session;
pub mod source;

pub use config::{ConfigError, WatchConfig};
pub use presenter::{report_registry_load, Presenter, SessionEvent, Severity};
pub use session::{
    RecognitionSession, SessionError, SessionState, StopHandle, TickOutcome, TickSummary,
};
pub use source::{FrameSource, SourceError};
