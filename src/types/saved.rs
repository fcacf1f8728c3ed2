// src/types/saved.rs
use serde::{Deserialize, Serialize};

use super::job::{de_fit_score, JobPosting};

/// Outreach text generated for one job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMaterials {
    pub inmail: String,
    pub cover_letter: String,
}

/// Body of `POST /save`
#[derive(Debug, Clone, Serialize)]
pub struct SavePayload {
    pub job: JobPosting,
    pub fit_score: u8,
    pub missing_skills: Vec<String>,
    pub generated: Option<GeneratedMaterials>,
    pub timestamp: String,
}

/// A server-persisted application entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRecord {
    pub id: String,
    pub job: JobPosting,
    #[serde(deserialize_with = "de_fit_score")]
    pub fit_score: u8,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub generated: Option<GeneratedMaterials>,
    #[serde(default)]
    pub has_generated: bool,
    pub timestamp: String,
}

impl SavedRecord {
    /// Materials worth showing: present and flagged as generated
    pub fn materials(&self) -> Option<&GeneratedMaterials> {
        if self.has_generated {
            self.generated.as_ref()
        } else {
            None
        }
    }
}
