//! # startup-registry
//!
//! A Rust web application for registering startup companies and
//! searching them with a hybrid pipeline combining vector semantic
//! similarity and keyword matching, with a graceful keyword fallback.
//!
//! ## Search resolution
//!
//! ```text
//!              ┌──────────────────────┐
//!              │  query + tag filters  │
//!              └──────────┬───────────┘
//!                         │
//!          query empty?   │
//!        ┌────────────────┴────────────────┐
//!        ▼ yes (tags present)              ▼ no
//! ┌──────────────┐              ┌─────────────────────┐
//! │  Tag lookup   │              │  Embed query text    │
//! │  (name order) │              │  (Ollama / OpenAI)   │
//! └──────────────┘              └──────────┬──────────┘
//!                                          │ valid, non-zero vector
//!                             ┌────────────┴────────────┐
//!                             ▼ ok                      ▼ failed
//!                  ┌───────────────────┐     ┌─────────────────────┐
//!                  │  Hybrid ranking    │     │  Keyword fallback    │
//!                  │  cosine + lexical  │     │  OR across fields,   │
//!                  │  threshold + cap   │     │  name matches first  │
//!                  └─────────┬─────────┘     └─────────────────────┘
//!                            │ ranking error ───────────▲
//!                            ▼
//!                  ┌───────────────────┐
//!                  │  Tag post-filter   │
//!                  │  strip scores      │
//!                  └───────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, data dir,
//!   embedding provider, and search tuning
//! - [`models`] - Shared data types: `Company`, `CompanySearchResult`,
//!   request/response types
//! - [`store`] - Company registry: JSON-persisted CRUD, tag lookup,
//!   keyword search, hybrid ranking, and the person/founder join
//! - [`search::hybrid`] - Blended cosine + lexical scoring
//! - [`search::resolver`] - The decision tree and fallback cascade
//! - [`embedding::provider`] - Embedding generation via Ollama or
//!   OpenAI-compatible APIs
//! - [`embedding::text`] - Company text synthesis for embeddings
//! - [`embedding::maintenance`] - Bulk backfill/regenerate operations
//! - [`api`] - Axum HTTP handlers for company CRUD, search, and
//!   embedding administration
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod embedding;
pub mod models;
pub mod search;
pub mod state;
pub mod store;
