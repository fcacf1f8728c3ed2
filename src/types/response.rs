use serde::{Deserialize, Serialize};

use super::job::{JobAnalysis, UrlMetaMap};

// ===== Service Response Types =====

/// `POST /upload/resume`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeUploadResponse {
    pub text: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// `POST /upload/csv`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvUploadResponse {
    pub urls: Vec<String>,
    #[serde(default)]
    pub meta: UrlMetaMap,
}

/// `POST /jobs/process`
#[derive(Debug, Deserialize)]
pub struct ProcessJobsResponse {
    pub jobs: Vec<JobAnalysis>,
}

/// `POST /jobs/process_one`
#[derive(Debug, Deserialize)]
pub struct ProcessOneResponse {
    pub job: JobAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct InmailResponse {
    pub inmail: String,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

/// `GET /saved/export`
#[derive(Debug, Deserialize)]
pub struct ExportResponse {
    pub csv: String,
}
