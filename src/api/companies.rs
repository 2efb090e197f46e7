use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::embedding::maintenance;
use crate::models::{Company, CreateCompanyRequest, UpdateCompanyRequest};
use crate::state::AppState;
use crate::store::StoreError;

/// POST /api/companies - Create a company; its embedding is computed
/// best-effort in the background.
pub async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<Company>), (StatusCode, String)> {
    if req.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Company name is required".to_string()));
    }

    let company = state.store.insert(&req).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to create company: {e}"),
        )
    })?;

    spawn_embedding_refresh(&state, company.id);

    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/companies/:id - Fetch one company, founders projected from
/// the person join.
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, (StatusCode, String)> {
    state
        .store
        .get_by_id(id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Company not found".to_string()))
}

/// PATCH /api/companies/:id - Partial update. The embedding is
/// recomputed when any field that feeds the embedding text is present.
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateCompanyRequest>,
) -> Result<Json<Company>, (StatusCode, String)> {
    if update.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "No updatable fields provided".to_string(),
        ));
    }
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Company name cannot be empty".to_string(),
        ));
    }

    let refresh = update.touches_embedding_fields();
    let company = state.store.update_by_id(id, &update).map_err(|e| match e {
        StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "Company not found".to_string()),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to update company: {other}"),
        ),
    })?;

    if refresh {
        spawn_embedding_refresh(&state, company.id);
    }

    Ok(Json(company))
}

/// DELETE /api/companies/:id - Remove a company and its founder links.
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.store.delete_by_id(id) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => {
            Err((StatusCode::NOT_FOUND, "Company not found".to_string()))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to delete company: {e}"),
        )),
    }
}

/// Recompute a company's embedding in the background; failures are
/// logged, never surfaced to the request that triggered them.
fn spawn_embedding_refresh(state: &AppState, id: Uuid) {
    let state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = maintenance::refresh_company_embedding(
            state.store.as_ref(),
            state.embedder.as_ref(),
            state.config.embedding.dim,
            id,
        )
        .await
        {
            tracing::warn!("Embedding refresh failed for company {id}: {e}");
        }
    });
}
