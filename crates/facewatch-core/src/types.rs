use serde::{Deserialize, Serialize};

/// Name used for display and logging when a face matches no registered identity.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Pixel-coordinate bounding box for a detected face.
///
/// Follows the (top, right, bottom, left) convention: `top`/`bottom` are row
/// indices, `left`/`right` are column indices, and the box covers
/// `[left, right) × [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// Face embedding vector. Similar faces sit close in Euclidean distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Compute Euclidean distance between two embeddings.
    pub fn euclidean_distance(&self, other: &Embedding) -> f32 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

/// One face found in a frame: where it is and what it looks like.
///
/// Transient — produced by the embedder for a single frame and consumed by
/// matching; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeFace {
    pub location: BoundingBox,
    pub embedding: Embedding,
}

/// Outcome of matching one probe embedding against the identity registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Matched identity name, or `None` for an unknown face.
    pub identity: Option<String>,
    /// `1.0 - distance` of the best candidate. Not clamped: very dissimilar
    /// faces produce negative values.
    pub confidence: f32,
    /// Euclidean distance of the best candidate.
    pub distance: f32,
}

impl MatchResult {
    /// The identity name, or `"Unknown"` for an unmatched face.
    pub fn display_name(&self) -> &str {
        self.identity.as_deref().unwrap_or(UNKNOWN_NAME)
    }
}
