//! Administrative bulk embedding operations and the best-effort
//! per-company refresh that create/update handlers spawn.
//!
//! Bulk operations run strictly sequentially to bound load on the
//! embedding provider; a per-company failure is logged and skipped so
//! one bad record never aborts the batch.

use thiserror::Error;
use uuid::Uuid;

use crate::embedding::provider::{EmbedError, EmbeddingProvider};
use crate::embedding::text::company_text;
use crate::embedding::{validate_embedding, InvalidEmbedding};
use crate::models::{Company, EmbeddingReport};
use crate::store::{CompanyStore, StoreError};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("company not found: {0}")]
    CompanyMissing(Uuid),
    #[error(transparent)]
    Embed(#[from] EmbedError),
    #[error(transparent)]
    Invalid(#[from] InvalidEmbedding),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Compute embeddings for companies that have none.
pub async fn backfill_embeddings(
    store: &CompanyStore,
    embedder: &dyn EmbeddingProvider,
    expected_dim: usize,
) -> EmbeddingReport {
    let targets = store.companies_missing_embedding();
    embed_companies(store, embedder, expected_dim, targets).await
}

/// Recompute embeddings for every company, overwriting existing ones.
/// Used after changing the embedding model or fixing bad data.
pub async fn regenerate_all_embeddings(
    store: &CompanyStore,
    embedder: &dyn EmbeddingProvider,
    expected_dim: usize,
) -> EmbeddingReport {
    let targets = store.companies_in_stored_order();
    embed_companies(store, embedder, expected_dim, targets).await
}

async fn embed_companies(
    store: &CompanyStore,
    embedder: &dyn EmbeddingProvider,
    expected_dim: usize,
    targets: Vec<Company>,
) -> EmbeddingReport {
    let mut updated_count = 0;

    for company in targets {
        match embed_one(store, embedder, expected_dim, &company).await {
            Ok(()) => updated_count += 1,
            Err(e) => {
                tracing::warn!(
                    "Skipping embedding for company {} ({}): {e}",
                    company.name,
                    company.id
                );
            }
        }
    }

    EmbeddingReport { updated_count }
}

async fn embed_one(
    store: &CompanyStore,
    embedder: &dyn EmbeddingProvider,
    expected_dim: usize,
    company: &Company,
) -> Result<(), RefreshError> {
    let text = company_text(company);
    let embedding = embedder.embed(&text).await?;
    validate_embedding(&embedding, expected_dim)?;
    store.set_embedding(company.id, embedding)?;
    Ok(())
}

/// Recompute one company's embedding from its current fields.
pub async fn refresh_company_embedding(
    store: &CompanyStore,
    embedder: &dyn EmbeddingProvider,
    expected_dim: usize,
    id: Uuid,
) -> Result<(), RefreshError> {
    let company = store.get_by_id(id).ok_or(RefreshError::CompanyMissing(id))?;
    embed_one(store, embedder, expected_dim, &company).await
}
