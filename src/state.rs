use std::sync::Arc;

use crate::config::Config;
use crate::embedding::provider::{EmbeddingProvider, HttpEmbeddingProvider};
use crate::store::CompanyStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<CompanyStore>,
    pub http_client: reqwest::Client,
    pub embedder: Arc<dyn EmbeddingProvider>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = CompanyStore::open_or_create(&config.data_dir)?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let embedder = Arc::new(HttpEmbeddingProvider::new(
            http_client.clone(),
            config.embedding.clone(),
        ));

        Ok(Self {
            config,
            store: Arc::new(store),
            http_client,
            embedder,
        })
    }
}
