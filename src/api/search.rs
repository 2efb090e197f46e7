use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::models::{Company, SearchFilters};
use crate::search::resolver::{self, SearchError};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Free-text query
    pub q: Option<String>,
    /// Comma-separated tag labels, all required
    pub tags: Option<String>,
}

/// GET /api/companies?q=&tags= - List or search companies.
/// Without query and tags this is a plain name-ordered listing;
/// otherwise the hybrid resolver runs.
pub async fn list_companies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Company>>, (StatusCode, String)> {
    let filters = SearchFilters {
        query: params.q.unwrap_or_default().trim().to_string(),
        tags: params
            .tags
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
    };

    if filters.query.is_empty() && filters.tags.is_empty() {
        return Ok(Json(state.store.list_all()));
    }

    match resolver::resolve(
        state.store.as_ref(),
        state.embedder.as_ref(),
        &state.config.search,
        state.config.embedding.dim,
        &filters,
    )
    .await
    {
        Ok(companies) => Ok(Json(companies)),
        // Unreachable given the guard above; answer with an empty list
        Err(SearchError::NoSearchActive) => Ok(Json(Vec::new())),
        Err(SearchError::StoreQueryFailed(err)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Search failed: {err}"),
        )),
    }
}
