// src/core/job_service.rs
//! The boundary between the client and the remote job service

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ClientResult;
use crate::types::response::{CsvUploadResponse, ResumeUploadResponse};
use crate::types::{CsvMeta, GeneratedMaterials, JobAnalysis, JobPosting, SavePayload, SavedRecord, UrlMetaMap};

/// A file picked for upload, already read into memory
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Body shared by both generation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub job: &'a JobPosting,
    pub resume_text: &'a str,
    pub matched_skills: &'a [String],
}

#[async_trait]
pub trait JobService: Send + Sync {
    async fn upload_resume(&self, file: UploadFile) -> ClientResult<ResumeUploadResponse>;

    async fn upload_csv(&self, file: UploadFile) -> ClientResult<CsvUploadResponse>;

    /// Score a whole batch in one request
    async fn process_jobs(
        &self,
        resume_text: &str,
        urls: &[String],
        url_meta: &UrlMetaMap,
    ) -> ClientResult<Vec<JobAnalysis>>;

    async fn process_one(
        &self,
        resume_text: &str,
        url: &str,
        meta: &CsvMeta,
    ) -> ClientResult<JobAnalysis>;

    async fn generate_inmail(&self, request: &GenerateRequest<'_>) -> ClientResult<String>;

    async fn generate_cover_letter(&self, request: &GenerateRequest<'_>) -> ClientResult<String>;

    async fn save(&self, payload: &SavePayload) -> ClientResult<SavedRecord>;

    async fn list_saved(&self) -> ClientResult<Vec<SavedRecord>>;

    /// Pre-rendered CSV of every saved record
    async fn export_saved(&self) -> ClientResult<String>;
}

/// Run both generation requests together; either failure fails the pair
pub async fn generate_materials<S>(
    service: &S,
    request: &GenerateRequest<'_>,
) -> ClientResult<GeneratedMaterials>
where
    S: JobService + ?Sized,
{
    let (inmail, cover_letter) = tokio::try_join!(
        service.generate_inmail(request),
        service.generate_cover_letter(request)
    )?;
    Ok(GeneratedMaterials {
        inmail,
        cover_letter,
    })
}
