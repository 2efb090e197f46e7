//! Hybrid search resolver.
//!
//! Decision tree, evaluated in order:
//!
//! 1. Empty query + tag filters → direct tag lookup, name ascending.
//! 2. Non-empty query → embed the query, validate the vector, and run
//!    the store's combined similarity + keyword ranking; tag filters are
//!    applied as a post-filter.
//! 3. Any failure on the embedding path (provider down, zero vector,
//!    ranking query error) degrades to a plain keyword search with the
//!    name-match partition applied.
//!
//! Only a failure of the final keyword query surfaces to the caller;
//! everything upstream is logged and absorbed.

use thiserror::Error;

use crate::config::SearchConfig;
use crate::embedding::provider::{EmbedError, EmbeddingProvider};
use crate::embedding::{validate_embedding, InvalidEmbedding};
use crate::models::{Company, CompanySearchResult, SearchFilters};
use crate::store::{CompanyStore, StoreError};

#[derive(Debug, Error)]
pub enum SearchError {
    /// Neither a query nor tag filters were supplied; callers should
    /// treat this as "no search active", not fetch the whole table.
    #[error("search requires a query or at least one tag filter")]
    NoSearchActive,
    /// The keyword fallback itself failed; there is no further
    /// degradation path.
    #[error("search failed: {0}")]
    StoreQueryFailed(#[from] StoreError),
}

/// Why the embedding path was abandoned. Never surfaced to callers;
/// logged at the fallback transition.
#[derive(Debug, Error)]
enum HybridFailure {
    #[error("embedding provider unavailable: {0}")]
    ProviderUnavailable(#[from] EmbedError),
    #[error("unusable query embedding: {0}")]
    InvalidEmbedding(#[from] InvalidEmbedding),
    #[error("hybrid ranking query failed: {0}")]
    RankingQueryFailed(StoreError),
}

/// Resolve a search: ranked companies for a free-text query and/or
/// required tags. Read-only.
pub async fn resolve(
    store: &CompanyStore,
    embedder: &dyn EmbeddingProvider,
    search: &SearchConfig,
    expected_dim: usize,
    filters: &SearchFilters,
) -> Result<Vec<Company>, SearchError> {
    let query = filters.query.trim();
    let tag_filters = filters.tags.as_slice();

    if query.is_empty() && tag_filters.is_empty() {
        return Err(SearchError::NoSearchActive);
    }

    // Tag-only lookup is boolean; no ranking involved.
    if query.is_empty() {
        return Ok(store.list_by_tags(tag_filters)?);
    }

    match hybrid_path(store, embedder, search, expected_dim, query, tag_filters).await {
        Ok(companies) => Ok(companies),
        Err(reason) => {
            tracing::warn!("Falling back to keyword search for '{query}': {reason}");
            keyword_fallback(store, query, tag_filters)
        }
    }
}

async fn hybrid_path(
    store: &CompanyStore,
    embedder: &dyn EmbeddingProvider,
    search: &SearchConfig,
    expected_dim: usize,
    query: &str,
    tag_filters: &[String],
) -> Result<Vec<Company>, HybridFailure> {
    let embedding = embedder.embed(query).await?;
    validate_embedding(&embedding, expected_dim)?;

    let ranked = store
        .hybrid_search(query, &embedding, search.match_threshold, search.match_count)
        .map_err(HybridFailure::RankingQueryFailed)?;

    // Scores are transient; only the ordering leaves this boundary.
    let mut companies: Vec<Company> = ranked
        .into_iter()
        .map(CompanySearchResult::into_company)
        .collect();

    // The ranking call takes no tag constraints, so intersect here.
    if !tag_filters.is_empty() {
        companies.retain(|c| c.has_all_tags(tag_filters));
    }

    Ok(companies)
}

/// Keyword search plus a stable partition: companies whose name contains
/// the query come first; relative order within each group is preserved.
fn keyword_fallback(
    store: &CompanyStore,
    query: &str,
    tag_filters: &[String],
) -> Result<Vec<Company>, SearchError> {
    let mut companies = store.keyword_search(query, tag_filters)?;
    let needle = query.to_lowercase();
    // sort_by_key is stable: ties keep their original relative order
    companies.sort_by_key(|c| !c.name.to_lowercase().contains(&needle));
    Ok(companies)
}
