//! Embedding generation: the provider client, company text synthesis,
//! and the administrative bulk maintenance operations.

pub mod maintenance;
pub mod provider;
pub mod text;

use thiserror::Error;

/// Rejection reasons for a vector that came back from the provider.
#[derive(Debug, Error)]
pub enum InvalidEmbedding {
    #[error("expected dimension {expected}, got {got}")]
    WrongDimension { expected: usize, got: usize },
    /// A zero vector signals provider failure, not a real embedding.
    #[error("zero vector")]
    ZeroVector,
}

/// Check that an embedding is usable: expected dimensionality and at
/// least one non-zero component.
pub fn validate_embedding(embedding: &[f32], expected_dim: usize) -> Result<(), InvalidEmbedding> {
    if embedding.len() != expected_dim {
        return Err(InvalidEmbedding::WrongDimension {
            expected: expected_dim,
            got: embedding.len(),
        });
    }
    if embedding.iter().all(|x| *x == 0.0) {
        return Err(InvalidEmbedding::ZeroVector);
    }
    Ok(())
}
