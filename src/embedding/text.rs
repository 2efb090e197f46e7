//! Descriptive text synthesis for company embeddings.

use crate::models::Company;

/// Build the text blob a company's embedding is computed from: labeled,
/// period-separated segments, skipping fields that are empty. Identical
/// input data always yields identical text, which keeps bulk
/// regeneration idempotent.
pub fn company_text(company: &Company) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(company.name.clone());
    if let Some(description) = &company.description {
        if !description.is_empty() {
            parts.push(description.clone());
        }
    }
    if !company.tags.is_empty() {
        parts.push(format!("Tags: {}", company.tags.join(", ")));
    }
    if !company.backing_vcs.is_empty() {
        parts.push(format!("Backing VCs: {}", company.backing_vcs.join(", ")));
    }
    if let Some(stage) = &company.stage {
        if !stage.is_empty() {
            parts.push(format!("Stage: {stage}"));
        }
    }
    if !company.founders.is_empty() {
        parts.push(format!("Founders: {}", company.founders.join(", ")));
    }

    parts.join(". ")
}
