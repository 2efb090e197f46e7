use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub sector: Option<String>,
    #[serde(default)]
    pub backing_vcs: Vec<String>,
    pub stage: Option<String>,
    /// Derived from the person/company join; never stored denormalized.
    #[serde(default)]
    pub founders: Vec<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// True when the company's tag set covers every requested tag
    /// (exact, case-sensitive label match).
    pub fn has_all_tags(&self, tags: &[String]) -> bool {
        tags.iter().all(|t| self.tags.contains(t))
    }
}

/// A company plus transient ranking scores from the hybrid search.
/// The scores never leave the resolver boundary.
#[derive(Debug, Clone)]
pub struct CompanySearchResult {
    pub company: Company,
    /// Cosine similarity against the query embedding.
    pub similarity: f32,
    /// Blended similarity + lexical score the ordering is based on.
    pub rank_score: f32,
}

impl CompanySearchResult {
    pub fn into_company(self) -> Company {
        self.company
    }
}

/// Search input: a trimmed free-text query and required tag labels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Create-company request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub sector: Option<String>,
    #[serde(default)]
    pub backing_vcs: Vec<String>,
    pub stage: Option<String>,
    #[serde(default)]
    pub founders: Vec<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
}

/// Partial-update request; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub sector: Option<String>,
    pub backing_vcs: Option<Vec<String>>,
    pub stage: Option<String>,
    pub founders: Option<Vec<String>>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
}

impl UpdateCompanyRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.sector.is_none()
            && self.backing_vcs.is_none()
            && self.stage.is_none()
            && self.founders.is_none()
            && self.website.is_none()
            && self.logo_url.is_none()
    }

    /// Whether the update touches a field that feeds the embedding text.
    pub fn touches_embedding_fields(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.tags.is_some()
            || self.backing_vcs.is_some()
            || self.stage.is_some()
            || self.founders.is_some()
    }
}

/// Outcome of a bulk embedding operation.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingReport {
    pub updated_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_company(name: &str) -> Company {
        Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            tags: vec![],
            sector: None,
            backing_vcs: vec![],
            stage: None,
            founders: vec![],
            website: None,
            logo_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_company_collections_deserialize_missing_as_empty() {
        let json = r#"{
            "id": "6f7c1f6e-9a9f-4f7a-8f2e-000000000001",
            "name": "Acme Robotics",
            "description": null,
            "sector": null,
            "stage": null,
            "website": null,
            "logo_url": null,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }"#;
        let company: Company = serde_json::from_str(json).unwrap();
        assert!(company.tags.is_empty());
        assert!(company.backing_vcs.is_empty());
        assert!(company.founders.is_empty());
    }

    #[test]
    fn test_company_collections_serialize_as_arrays() {
        let company = bare_company("Acme");
        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["tags"], serde_json::json!([]));
        assert_eq!(json["backing_vcs"], serde_json::json!([]));
        assert_eq!(json["founders"], serde_json::json!([]));
    }

    #[test]
    fn test_has_all_tags_is_superset_check() {
        let mut company = bare_company("Acme");
        company.tags = vec!["robotics".to_string(), "ai".to_string()];

        assert!(company.has_all_tags(&["robotics".to_string()]));
        assert!(company.has_all_tags(&["robotics".to_string(), "ai".to_string()]));
        assert!(!company.has_all_tags(&["fintech".to_string()]));
        // Labels are case-sensitive
        assert!(!company.has_all_tags(&["Robotics".to_string()]));

        company.tags.clear();
        assert!(company.has_all_tags(&[]));
    }

    #[test]
    fn test_update_request_emptiness_and_embedding_relevance() {
        let empty = UpdateCompanyRequest::default();
        assert!(empty.is_empty());
        assert!(!empty.touches_embedding_fields());

        let website_only = UpdateCompanyRequest {
            website: Some("https://acme.example".to_string()),
            ..Default::default()
        };
        assert!(!website_only.is_empty());
        assert!(!website_only.touches_embedding_fields());

        let description_only = UpdateCompanyRequest {
            description: Some("Builds robots".to_string()),
            ..Default::default()
        };
        assert!(description_only.touches_embedding_fields());
    }
}
