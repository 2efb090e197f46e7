//! Scoring for the store's combined similarity + keyword ranking.
//!
//! `rank_score` blends cosine similarity against the stored company
//! embedding with a lexical relevance component, so a strong name match
//! still ranks even when the vector side is weak.

use crate::models::Company;

/// Weight of the vector similarity component in the blended score.
const SIMILARITY_WEIGHT: f32 = 0.6;
/// Weight of the lexical component in the blended score.
const LEXICAL_WEIGHT: f32 = 0.4;

/// Lexical relevance weights, strongest field first.
const NAME_HIT: f32 = 1.0;
const DESCRIPTION_HIT: f32 = 0.6;
const ATTRIBUTE_HIT: f32 = 0.4;

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Lexical relevance of `query` for a company: the strongest matching
/// field wins. Text fields match on case-insensitive substring, list
/// fields on case-insensitive element containment. 0.0 means no hit.
pub fn lexical_score(query: &str, company: &Company) -> f32 {
    let needle = query.to_lowercase();
    let text_hit = |text: &str| text.to_lowercase().contains(&needle);
    let list_hit = |items: &[String]| items.iter().any(|i| i.to_lowercase() == needle);

    if text_hit(&company.name) {
        return NAME_HIT;
    }
    if company.description.as_deref().is_some_and(text_hit) {
        return DESCRIPTION_HIT;
    }
    if list_hit(&company.tags)
        || company.sector.as_deref().is_some_and(text_hit)
        || list_hit(&company.backing_vcs)
        || company.stage.as_deref().is_some_and(text_hit)
        || list_hit(&company.founders)
    {
        return ATTRIBUTE_HIT;
    }
    0.0
}

/// Blend similarity and lexical relevance into the final ranking score.
pub fn blend(similarity: f32, lexical: f32) -> f32 {
    SIMILARITY_WEIGHT * similarity.max(0.0) + LEXICAL_WEIGHT * lexical
}
