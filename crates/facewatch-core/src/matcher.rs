//! Identity matching: minimum Euclidean distance with a tolerance cut.

use crate::registry::IdentityRegistry;
use crate::types::{Embedding, MatchResult};
use thiserror::Error;

/// Default distance tolerance. A candidate at or below it passes the cut.
pub const DEFAULT_TOLERANCE: f32 = 0.6;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("no reference identities to match against")]
    EmptyRegistry,
}

/// Strategy for deciding which registered identity (if any) a probe belongs to.
pub trait MatchPolicy {
    fn compare(
        &self,
        probe: &Embedding,
        registry: &IdentityRegistry,
        tolerance: f32,
    ) -> Result<MatchResult, MatchError>;
}

/// Nearest-neighbor Euclidean matcher.
///
/// Picks the registry entry at minimum distance (first entry wins ties) and
/// accepts it when that candidate's tolerance check passes. Confidence is
/// `1.0 - distance`, left unclamped.
pub struct EuclideanMatcher;

impl MatchPolicy for EuclideanMatcher {
    fn compare(
        &self,
        probe: &Embedding,
        registry: &IdentityRegistry,
        tolerance: f32,
    ) -> Result<MatchResult, MatchError> {
        // Per-candidate tolerance flags, then the argmin — the accept
        // decision reads the flag at the best index.
        let mut passes = Vec::with_capacity(registry.len());
        let mut best: Option<(usize, f32)> = None;

        for (i, entry) in registry.entries().iter().enumerate() {
            let distance = probe.euclidean_distance(&entry.embedding);
            passes.push(distance <= tolerance);
            let better = match best {
                None => true,
                Some((_, best_distance)) => distance < best_distance,
            };
            if better {
                best = Some((i, distance));
            }
        }

        let Some((best_idx, distance)) = best else {
            return Err(MatchError::EmptyRegistry);
        };

        let identity = if passes[best_idx] {
            Some(registry.entries()[best_idx].name.clone())
        } else {
            None
        };

        Ok(MatchResult { identity, confidence: 1.0 - distance, distance })
    }
}
