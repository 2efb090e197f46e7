use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the registry JSON is stored
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Embedding provider configuration
    pub embedding: EmbeddingConfig,
    /// Hybrid search tuning
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the embedding API
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
    /// Expected embedding vector dimension
    pub dim: usize,
    /// Per-request timeout in seconds; a timeout counts as a provider
    /// failure and triggers the keyword fallback.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum cosine similarity for a pure-vector match
    pub match_threshold: f32,
    /// Result cap for the hybrid ranking call
    pub match_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:9100".to_string(),
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            api_key: None,
            dim: 768,
            timeout_secs: 10,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.3,
            match_count: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("REGISTRY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("REGISTRY_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(provider) = std::env::var("EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }
        if let Ok(url) = std::env::var("EMBEDDING_BASE_URL") {
            config.embedding.base_url = url;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(key) = std::env::var("EMBEDDING_API_KEY") {
            config.embedding.api_key = Some(key);
        }
        if let Ok(dim) = std::env::var("EMBEDDING_DIM") {
            if let Ok(d) = dim.parse() {
                config.embedding.dim = d;
            }
        }
        if let Ok(val) = std::env::var("EMBEDDING_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.embedding.timeout_secs = v.min(60); // Cap at 60s
            }
        }
        if let Ok(val) = std::env::var("SEARCH_MATCH_THRESHOLD") {
            if let Ok(v) = val.parse() {
                config.search.match_threshold = v;
            }
        }
        if let Ok(val) = std::env::var("SEARCH_MATCH_COUNT") {
            if let Ok(v) = val.parse() {
                config.search.match_count = v;
            }
        }

        config
    }

    pub fn registry_path(&self) -> PathBuf {
        self.data_dir.join("registry.json")
    }
}
