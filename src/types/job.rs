// src/types/job.rs
//! Job posting and fit analysis structures, field names follow the service wire contract

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Per-URL metadata recorded from the CSV columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvMeta {
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub workplace_type: Option<String>,
}

pub type UrlMetaMap = HashMap<String, CsvMeta>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub url: String,
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub work_type: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_opt_textual",
        skip_serializing_if = "Option::is_none"
    )]
    pub applicant_count: Option<String>,
}

/// One scored posting as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub job: JobPosting,
    #[serde(deserialize_with = "de_fit_score")]
    pub fit_score: u8,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}

impl JobAnalysis {
    pub fn id(&self) -> &str {
        &self.job.id
    }

    pub fn url(&self) -> &str {
        &self.job.url
    }
}

/// The service may emit the score as an integer or a float; normalise to 0..=100
pub(crate) fn de_fit_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("fit_score must be a finite number"));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

fn de_opt_textual<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Textual {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Textual>::deserialize(deserializer)?.map(|value| match value {
        Textual::Text(text) => text,
        Textual::Number(n) => n.to_string(),
    }))
}
