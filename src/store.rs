//! In-memory company registry with atomic JSON persistence.
//!
//! Owns all persisted state: company rows (with their optional embedding
//! vectors), people, and the person/company links that founder lists are
//! derived from. Search entry points return `Result` so callers can treat
//! a failing store query as a hard error distinct from provider failures.

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Company, CompanySearchResult, CreateCompanyRequest, UpdateCompanyRequest};
use crate::search::hybrid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("company not found: {0}")]
    NotFound(Uuid),
    #[error("failed to read or write registry: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode registry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A stored company row. Founders are intentionally absent: they are
/// derived from `PersonCompanyLink` rows on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CompanyRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    sector: Option<String>,
    #[serde(default)]
    backing_vcs: Vec<String>,
    stage: Option<String>,
    website: Option<String>,
    logo_url: Option<String>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
    /// None until computed. An all-zero vector is treated as absent.
    embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Person {
    id: Uuid,
    first_name: String,
    last_name: String,
}

impl Person {
    fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersonCompanyLink {
    company_id: Uuid,
    person_id: Uuid,
    is_founder: bool,
    #[serde(default)]
    role: String,
    #[serde(default)]
    currently_works_here: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistryData {
    #[serde(default)]
    companies: Vec<CompanyRow>,
    #[serde(default)]
    people: Vec<Person>,
    #[serde(default)]
    links: Vec<PersonCompanyLink>,
}

/// The company store.
pub struct CompanyStore {
    data: RwLock<RegistryData>,
    persist_path: PathBuf,
}

impl CompanyStore {
    pub fn open_or_create(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;
        let persist_path = data_dir.join("registry.json");

        let data = if persist_path.exists() {
            let raw = std::fs::read_to_string(&persist_path)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            RegistryData::default()
        };

        Ok(Self {
            data: RwLock::new(data),
            persist_path,
        })
    }

    /// Persist registry to disk (atomic write via temp file + rename).
    fn persist(&self, data: &RegistryData) -> Result<(), StoreError> {
        let raw = serde_json::to_string(data)?;
        let tmp_path = self.persist_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, raw)?;
        std::fs::rename(&tmp_path, &self.persist_path)?;
        Ok(())
    }

    // ─── CRUD ────────────────────────────────────────────────

    pub fn insert(&self, req: &CreateCompanyRequest) -> Result<Company, StoreError> {
        let mut data = self.data.write();
        let now = Utc::now();
        let row = CompanyRow {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            description: req.description.clone(),
            tags: req.tags.clone(),
            sector: req.sector.clone(),
            backing_vcs: req.backing_vcs.clone(),
            stage: req.stage.clone(),
            website: req.website.clone(),
            logo_url: req.logo_url.clone(),
            created_at: now,
            updated_at: now,
            embedding: None,
        };
        replace_founder_links(&mut data, row.id, &req.founders);
        let company = project(&data, &row);
        data.companies.push(row);

        self.persist(&data)?;
        Ok(company)
    }

    pub fn update_by_id(
        &self,
        id: Uuid,
        update: &UpdateCompanyRequest,
    ) -> Result<Company, StoreError> {
        let mut data = self.data.write();
        let idx = data
            .companies
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))?;

        {
            let row = &mut data.companies[idx];
            if let Some(name) = &update.name {
                row.name = name.trim().to_string();
            }
            if let Some(description) = &update.description {
                row.description = Some(description.clone());
            }
            if let Some(tags) = &update.tags {
                row.tags = tags.clone();
            }
            if let Some(sector) = &update.sector {
                row.sector = Some(sector.clone());
            }
            if let Some(backing_vcs) = &update.backing_vcs {
                row.backing_vcs = backing_vcs.clone();
            }
            if let Some(stage) = &update.stage {
                row.stage = Some(stage.clone());
            }
            if let Some(website) = &update.website {
                row.website = Some(website.clone());
            }
            if let Some(logo_url) = &update.logo_url {
                row.logo_url = Some(logo_url.clone());
            }
            row.updated_at = Utc::now();
        }

        if let Some(founders) = &update.founders {
            replace_founder_links(&mut data, id, founders);
        }

        self.persist(&data)?;
        Ok(project(&data, &data.companies[idx]))
    }

    pub fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        let mut data = self.data.write();
        let before = data.companies.len();
        data.companies.retain(|c| c.id != id);
        if data.companies.len() == before {
            return Err(StoreError::NotFound(id));
        }
        data.links.retain(|l| l.company_id != id);
        self.persist(&data)
    }

    pub fn get_by_id(&self, id: Uuid) -> Option<Company> {
        let data = self.data.read();
        data.companies
            .iter()
            .find(|c| c.id == id)
            .map(|row| project(&data, row))
    }

    /// All companies, name ascending.
    pub fn list_all(&self) -> Vec<Company> {
        let data = self.data.read();
        let mut companies: Vec<Company> =
            data.companies.iter().map(|row| project(&data, row)).collect();
        sort_by_name(&mut companies);
        companies
    }

    // ─── Search ──────────────────────────────────────────────

    /// Companies whose tag set covers every requested tag, name ascending.
    pub fn list_by_tags(&self, tags: &[String]) -> Result<Vec<Company>, StoreError> {
        let data = self.data.read();
        let mut companies: Vec<Company> = data
            .companies
            .iter()
            .filter(|row| tags.iter().all(|t| row.tags.contains(t)))
            .map(|row| project(&data, row))
            .collect();
        sort_by_name(&mut companies);
        Ok(companies)
    }

    /// Case-insensitive keyword match: the query may appear in any of
    /// name, description, tags, sector, backing_vcs, stage, or founders
    /// (OR); `tags` is an AND-conjunction. Name-ascending base order.
    pub fn keyword_search(
        &self,
        query: &str,
        tags: &[String],
    ) -> Result<Vec<Company>, StoreError> {
        let data = self.data.read();
        let needle = query.to_lowercase();
        let mut companies: Vec<Company> = data
            .companies
            .iter()
            .filter(|row| tags.iter().all(|t| row.tags.contains(t)))
            .map(|row| project(&data, row))
            .filter(|company| matches_keyword(company, &needle))
            .collect();
        sort_by_name(&mut companies);
        Ok(companies)
    }

    /// Combined similarity + keyword ranking, best-match-first, capped at
    /// `match_count`. A company qualifies when its cosine similarity meets
    /// `match_threshold` or it has any lexical hit for the query.
    pub fn hybrid_search(
        &self,
        query: &str,
        query_embedding: &[f32],
        match_threshold: f32,
        match_count: usize,
    ) -> Result<Vec<CompanySearchResult>, StoreError> {
        let data = self.data.read();
        let mut results: Vec<CompanySearchResult> = data
            .companies
            .iter()
            .filter_map(|row| {
                let similarity = live_embedding(row)
                    .map(|e| hybrid::cosine_similarity(query_embedding, e))
                    .unwrap_or(0.0);
                let company = project(&data, row);
                let lexical = hybrid::lexical_score(query, &company);
                if similarity < match_threshold && lexical == 0.0 {
                    return None;
                }
                let rank_score = hybrid::blend(similarity, lexical);
                Some(CompanySearchResult {
                    company,
                    similarity,
                    rank_score,
                })
            })
            .collect();

        // Descending score, name as the deterministic tie-break
        results.sort_by(|a, b| {
            b.rank_score
                .partial_cmp(&a.rank_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.company.name.cmp(&b.company.name))
        });
        results.truncate(match_count);
        Ok(results)
    }

    // ─── Embeddings ──────────────────────────────────────────

    pub fn set_embedding(&self, id: Uuid, embedding: Vec<f32>) -> Result<(), StoreError> {
        let mut data = self.data.write();
        let row = data
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))?;
        row.embedding = Some(embedding);
        self.persist(&data)
    }

    /// Companies with no usable embedding (absent or all-zero), in stored order.
    pub fn companies_missing_embedding(&self) -> Vec<Company> {
        let data = self.data.read();
        data.companies
            .iter()
            .filter(|row| live_embedding(row).is_none())
            .map(|row| project(&data, row))
            .collect()
    }

    /// Every company, in stored order (bulk regeneration input).
    pub fn companies_in_stored_order(&self) -> Vec<Company> {
        let data = self.data.read();
        data.companies.iter().map(|row| project(&data, row)).collect()
    }

    /// Raw embedding for a company, if one is stored (tests and diagnostics).
    pub fn embedding_of(&self, id: Uuid) -> Option<Vec<f32>> {
        let data = self.data.read();
        data.companies
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.embedding.clone())
    }

    pub fn company_count(&self) -> usize {
        self.data.read().companies.len()
    }
}

/// Embedding usable for similarity search: present and not the zero vector.
fn live_embedding(row: &CompanyRow) -> Option<&[f32]> {
    row.embedding
        .as_deref()
        .filter(|v| v.iter().any(|x| *x != 0.0))
}

/// Project a row to the external shape, deriving founders from the join.
fn project(data: &RegistryData, row: &CompanyRow) -> Company {
    Company {
        id: row.id,
        name: row.name.clone(),
        description: row.description.clone(),
        tags: row.tags.clone(),
        sector: row.sector.clone(),
        backing_vcs: row.backing_vcs.clone(),
        stage: row.stage.clone(),
        founders: founders_of(data, row.id),
        website: row.website.clone(),
        logo_url: row.logo_url.clone(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn founders_of(data: &RegistryData, company_id: Uuid) -> Vec<String> {
    data.links
        .iter()
        .filter(|l| l.company_id == company_id && l.is_founder)
        .filter_map(|l| data.people.iter().find(|p| p.id == l.person_id))
        .map(Person::full_name)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Replace the founder links for a company, reusing existing people by name.
fn replace_founder_links(data: &mut RegistryData, company_id: Uuid, founders: &[String]) {
    data.links
        .retain(|l| !(l.company_id == company_id && l.is_founder));

    for full_name in founders {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            continue;
        }
        let mut parts = full_name.split_whitespace();
        let first_name = parts.next().unwrap_or_default().to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");

        let person_id = data
            .people
            .iter()
            .find(|p| p.first_name == first_name && p.last_name == last_name)
            .map(|p| p.id)
            .unwrap_or_else(|| {
                let person = Person {
                    id: Uuid::new_v4(),
                    first_name,
                    last_name,
                };
                let id = person.id;
                data.people.push(person);
                id
            });

        data.links.push(PersonCompanyLink {
            company_id,
            person_id,
            is_founder: true,
            role: String::new(),
            currently_works_here: true,
        });
    }
}

fn sort_by_name(companies: &mut [Company]) {
    companies.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}

fn matches_keyword(company: &Company, needle: &str) -> bool {
    let text_hit = |text: &str| text.to_lowercase().contains(needle);
    let list_hit = |items: &[String]| items.iter().any(|i| i.to_lowercase() == *needle);

    text_hit(&company.name)
        || company.description.as_deref().is_some_and(text_hit)
        || list_hit(&company.tags)
        || company.sector.as_deref().is_some_and(text_hit)
        || list_hit(&company.backing_vcs)
        || company.stage.as_deref().is_some_and(text_hit)
        || list_hit(&company.founders)
}
