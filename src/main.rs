use axum::routing::{delete, get, patch, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use startup_registry::api;
use startup_registry::config::Config;
use startup_registry::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!(
        "Embedding provider: {} ({})",
        config.embedding.provider,
        config.embedding.base_url
    );

    let state = AppState::new(config.clone())?;
    tracing::info!("Registry loaded with {} companies", state.store.company_count());

    let app = Router::new()
        .route("/api/companies", get(api::search::list_companies))
        .route("/api/companies", post(api::companies::create_company))
        .route("/api/companies/{id}", get(api::companies::get_company))
        .route("/api/companies/{id}", patch(api::companies::update_company))
        .route("/api/companies/{id}", delete(api::companies::delete_company))
        .route("/api/companies/embeddings", post(api::embeddings::backfill))
        .route(
            "/api/companies/embeddings/regenerate",
            post(api::embeddings::regenerate),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
