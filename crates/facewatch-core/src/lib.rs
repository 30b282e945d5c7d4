//! facewatch-core — identity matching over face embeddings.
//!
//! Frames, embeddings, the distance matcher, and the registry of known
//! identities. Face detection and embedding extraction are external and
//! live behind the [`FaceEmbedder`] seam.

pub mod embedder;
pub mod frame;
pub mod matcher;
pub mod registry;
pub mod types;

pub use embedder::FaceEmbedder;
pub use frame::{Frame, FrameError};
pub use matcher::{EuclideanMatcher, MatchError, MatchPolicy, DEFAULT_TOLERANCE};
pub use registry::{IdentityRegistry, KnownIdentity, LoadReport, RegistryError, SkipReason};
pub use types::{BoundingBox, Embedding, MatchResult, ProbeFace, UNKNOWN_NAME};
