use axum::extract::State;
use axum::Json;

use crate::embedding::maintenance;
use crate::models::EmbeddingReport;
use crate::state::AppState;

/// POST /api/companies/embeddings - Compute embeddings for companies
/// that have none. Per-company failures are logged and skipped.
pub async fn backfill(State(state): State<AppState>) -> Json<EmbeddingReport> {
    let report = maintenance::backfill_embeddings(
        state.store.as_ref(),
        state.embedder.as_ref(),
        state.config.embedding.dim,
    )
    .await;
    tracing::info!("Backfilled embeddings for {} companies", report.updated_count);
    Json(report)
}

/// POST /api/companies/embeddings/regenerate - Recompute every
/// company's embedding, overwriting existing ones.
pub async fn regenerate(State(state): State<AppState>) -> Json<EmbeddingReport> {
    let report = maintenance::regenerate_all_embeddings(
        state.store.as_ref(),
        state.embedder.as_ref(),
        state.config.embedding.dim,
    )
    .await;
    tracing::info!(
        "Regenerated embeddings for {} companies",
        report.updated_count
    );
    Json(report)
}
