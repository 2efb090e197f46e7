//! Integration tests for the company search pipeline.
//!
//! These exercise the store, resolver, and embedding maintenance
//! end-to-end, with the embedding provider served by a local HTTP mock.

use httpmock::prelude::*;
use serde_json::json;

use startup_registry::config::{EmbeddingConfig, SearchConfig};
use startup_registry::embedding::maintenance;
use startup_registry::embedding::provider::{EmbeddingProvider, HttpEmbeddingProvider};
use startup_registry::models::{CreateCompanyRequest, SearchFilters, UpdateCompanyRequest};
use startup_registry::search::resolver;
use startup_registry::store::CompanyStore;

const DIM: usize = 3;

fn company(name: &str, description: Option<&str>, tags: &[&str]) -> CreateCompanyRequest {
    CreateCompanyRequest {
        name: name.to_string(),
        description: description.map(|d| d.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        sector: None,
        backing_vcs: vec![],
        stage: None,
        founders: vec![],
        website: None,
        logo_url: None,
    }
}

fn search_config() -> SearchConfig {
    SearchConfig {
        match_threshold: 0.3,
        match_count: 50,
    }
}

fn filters(query: &str, tags: &[&str]) -> SearchFilters {
    SearchFilters {
        query: query.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn provider_for(server: &MockServer) -> HttpEmbeddingProvider {
    let config = EmbeddingConfig {
        provider: "ollama".to_string(),
        base_url: server.base_url(),
        model: "nomic-embed-text".to_string(),
        api_key: None,
        dim: DIM,
        timeout_secs: 5,
    };
    HttpEmbeddingProvider::new(reqwest::Client::new(), config)
}

#[tokio::test]
async fn test_tag_only_search_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = CompanyStore::open_or_create(dir.path()).unwrap();
    store
        .insert(&company("Acme Robotics", None, &["robotics", "ai"]))
        .unwrap();
    store
        .insert(&company("Beta Corp", None, &["robotics"]))
        .unwrap();

    let server = MockServer::start_async().await;
    let provider = provider_for(&server);

    let results = resolver::resolve(
        &store,
        &provider,
        &search_config(),
        DIM,
        &filters("", &["robotics"]),
    )
    .await
    .unwrap();
    let names: Vec<&str> = results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Acme Robotics", "Beta Corp"]);

    let results = resolver::resolve(
        &store,
        &provider,
        &search_config(),
        DIM,
        &filters("", &["robotics", "ai"]),
    )
    .await
    .unwrap();
    let names: Vec<&str> = results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Acme Robotics"]);
}

#[tokio::test]
async fn test_hybrid_search_with_live_provider() {
    let dir = tempfile::tempdir().unwrap();
    let store = CompanyStore::open_or_create(dir.path()).unwrap();
    let acme = store
        .insert(&company("Acme Robotics", None, &["robotics"]))
        .unwrap();
    let beta = store.insert(&company("Beta Corp", None, &[])).unwrap();
    store.set_embedding(acme.id, vec![1.0, 0.0, 0.0]).unwrap();
    store.set_embedding(beta.id, vec![0.0, 1.0, 0.0]).unwrap();

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200)
                .json_body(json!({ "embeddings": [[0.95, 0.05, 0.0]] }));
        })
        .await;

    let provider = provider_for(&server);
    let results = resolver::resolve(
        &store,
        &provider,
        &search_config(),
        DIM,
        &filters("warehouse robots", &[]),
    )
    .await
    .unwrap();

    mock.assert_async().await;
    // Only Acme clears the similarity threshold
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Acme Robotics");
}

#[tokio::test]
async fn test_provider_outage_degrades_to_keyword_search() {
    let dir = tempfile::tempdir().unwrap();
    let store = CompanyStore::open_or_create(dir.path()).unwrap();
    store
        .insert(&company("Acme Robotics", None, &[]))
        .unwrap();
    store
        .insert(&company("Beta Corp", Some("Acme spinoff"), &[]))
        .unwrap();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(500).body("provider exploded");
        })
        .await;

    let provider = provider_for(&server);
    let results = resolver::resolve(&store, &provider, &search_config(), DIM, &filters("Acme", &[]))
        .await
        .unwrap();

    // Name match sorts before the description-only match
    let names: Vec<&str> = results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Acme Robotics", "Beta Corp"]);
}

#[tokio::test]
async fn test_zero_vector_from_provider_degrades_to_keyword_search() {
    let dir = tempfile::tempdir().unwrap();
    let store = CompanyStore::open_or_create(dir.path()).unwrap();
    store
        .insert(&company("Acme Robotics", None, &[]))
        .unwrap();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200)
                .json_body(json!({ "embeddings": [[0.0, 0.0, 0.0]] }));
        })
        .await;

    let provider = provider_for(&server);
    let results = resolver::resolve(&store, &provider, &search_config(), DIM, &filters("acme", &[]))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Acme Robotics");
}

#[tokio::test]
async fn test_backfill_and_regenerate_via_http_provider() {
    let dir = tempfile::tempdir().unwrap();
    let store = CompanyStore::open_or_create(dir.path()).unwrap();
    let acme = store
        .insert(&company("Acme Robotics", Some("Warehouse automation"), &["robotics"]))
        .unwrap();
    let beta = store.insert(&company("Beta Corp", None, &[])).unwrap();
    store.set_embedding(beta.id, vec![0.5, 0.5, 0.5]).unwrap();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(200)
                .json_body(json!({ "embeddings": [[0.1, 0.2, 0.3]] }));
        })
        .await;

    let provider = provider_for(&server);

    // Backfill touches only the company with no embedding
    let report = maintenance::backfill_embeddings(&store, &provider, DIM).await;
    assert_eq!(report.updated_count, 1);
    assert_eq!(store.embedding_of(acme.id).unwrap(), vec![0.1, 0.2, 0.3]);
    assert_eq!(store.embedding_of(beta.id).unwrap(), vec![0.5, 0.5, 0.5]);

    // Regenerate overwrites everything; rerunning it yields the same state
    let report = maintenance::regenerate_all_embeddings(&store, &provider, DIM).await;
    assert_eq!(report.updated_count, 2);
    let report = maintenance::regenerate_all_embeddings(&store, &provider, DIM).await;
    assert_eq!(report.updated_count, 2);
    assert_eq!(store.embedding_of(acme.id).unwrap(), vec![0.1, 0.2, 0.3]);
    assert_eq!(store.embedding_of(beta.id).unwrap(), vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_openai_provider_shape() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/embeddings")
                .header("authorization", "Bearer secret");
            then.status(200)
                .json_body(json!({ "data": [{ "embedding": [0.1, 0.2, 0.3] }] }));
        })
        .await;

    let config = EmbeddingConfig {
        provider: "openai".to_string(),
        base_url: server.base_url(),
        model: "text-embedding-3-small".to_string(),
        api_key: Some("secret".to_string()),
        dim: DIM,
        timeout_secs: 5,
    };
    let provider = HttpEmbeddingProvider::new(reqwest::Client::new(), config);

    let embedding = provider.embed("Acme Robotics").await.unwrap();
    mock.assert_async().await;
    assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_update_then_refresh_reflects_new_description() {
    let dir = tempfile::tempdir().unwrap();
    let store = CompanyStore::open_or_create(dir.path()).unwrap();
    let acme = store
        .insert(&company("Acme Robotics", Some("old text"), &[]))
        .unwrap();

    let update = UpdateCompanyRequest {
        description: Some("autonomous forklifts".to_string()),
        ..Default::default()
    };
    store.update_by_id(acme.id, &update).unwrap();

    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/embed")
                .body_includes("autonomous forklifts");
            then.status(200)
                .json_body(json!({ "embeddings": [[0.4, 0.5, 0.6]] }));
        })
        .await;

    let provider = provider_for(&server);
    maintenance::refresh_company_embedding(&store, &provider, DIM, acme.id)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(store.embedding_of(acme.id).unwrap(), vec![0.4, 0.5, 0.6]);
}
