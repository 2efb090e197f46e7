//! Axum HTTP handlers: company CRUD, search, and embedding administration.

pub mod companies;
pub mod embeddings;
pub mod search;
