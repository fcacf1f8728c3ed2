// src/core/service_client.rs
//! HTTP client for the remote job service

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use super::job_service::{GenerateRequest, JobService, UploadFile};
use crate::app_log;
use crate::environment::normalize_base_url;
use crate::error::{ClientError, ClientResult};
use crate::types::response::{
    CoverLetterResponse, CsvUploadResponse, ExportResponse, InmailResponse, ProcessJobsResponse,
    ProcessOneResponse, ResumeUploadResponse,
};
use crate::types::{CsvMeta, JobAnalysis, SavePayload, SavedRecord, UrlMetaMap};
use crate::utils::content_type_for;

const UPLOAD_RESUME_ENDPOINT: &str = "/upload/resume";
const UPLOAD_CSV_ENDPOINT: &str = "/upload/csv";
const PROCESS_ENDPOINT: &str = "/jobs/process";
const PROCESS_ONE_ENDPOINT: &str = "/jobs/process_one";
const INMAIL_ENDPOINT: &str = "/generate/inmail";
const COVER_LETTER_ENDPOINT: &str = "/generate/coverletter";
const SAVE_ENDPOINT: &str = "/save";
const SAVED_ENDPOINT: &str = "/saved";
const EXPORT_ENDPOINT: &str = "/saved/export";

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl ServiceClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn file_form(file: UploadFile) -> ClientResult<Form> {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name.clone())
            .mime_str(content_type_for(&file.file_name))?;
        Ok(Form::new().part("file", part))
    }

    async fn post_multipart<R>(&self, path: &str, form: Form) -> ClientResult<R>
    where
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        app_log!(info, "POST multipart {}", url);

        let response = self.client.post(&url).multipart(form).send().await?;
        read_response(&url, response).await
    }

    async fn post_json<T, R>(&self, path: &str, payload: &T) -> ClientResult<R>
    where
        T: serde::Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        app_log!(trace, "POST json {}", url);

        let response = self.client.post(&url).json(payload).send().await?;
        read_response(&url, response).await
    }

    async fn get<R>(&self, path: &str) -> ClientResult<R>
    where
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        app_log!(trace, "GET {}", url);

        let response = self.client.get(&url).send().await?;
        read_response(&url, response).await
    }
}

#[async_trait]
impl JobService for ServiceClient {
    async fn upload_resume(&self, file: UploadFile) -> ClientResult<ResumeUploadResponse> {
        let form = Self::file_form(file)?;
        self.post_multipart(UPLOAD_RESUME_ENDPOINT, form).await
    }

    async fn upload_csv(&self, file: UploadFile) -> ClientResult<CsvUploadResponse> {
        let form = Self::file_form(file)?;
        self.post_multipart(UPLOAD_CSV_ENDPOINT, form).await
    }

    async fn process_jobs(
        &self,
        resume_text: &str,
        urls: &[String],
        url_meta: &UrlMetaMap,
    ) -> ClientResult<Vec<JobAnalysis>> {
        let meta_json =
            serde_json::to_string(url_meta).map_err(|e| ClientError::Decode(e.to_string()))?;
        let form = Form::new()
            .text("resume_text", resume_text.to_string())
            .text("urls", urls.join(","))
            .text("url_meta", meta_json);

        let response: ProcessJobsResponse = self.post_multipart(PROCESS_ENDPOINT, form).await?;
        Ok(response.jobs)
    }

    async fn process_one(
        &self,
        resume_text: &str,
        url: &str,
        meta: &CsvMeta,
    ) -> ClientResult<JobAnalysis> {
        let meta_json =
            serde_json::to_string(meta).map_err(|e| ClientError::Decode(e.to_string()))?;
        let form = Form::new()
            .text("resume_text", resume_text.to_string())
            .text("url", url.to_string())
            .text("meta", meta_json);

        let response: ProcessOneResponse = self.post_multipart(PROCESS_ONE_ENDPOINT, form).await?;
        Ok(response.job)
    }

    async fn generate_inmail(&self, request: &GenerateRequest<'_>) -> ClientResult<String> {
        let response: InmailResponse = self.post_json(INMAIL_ENDPOINT, request).await?;
        Ok(response.inmail)
    }

    async fn generate_cover_letter(&self, request: &GenerateRequest<'_>) -> ClientResult<String> {
        let response: CoverLetterResponse = self.post_json(COVER_LETTER_ENDPOINT, request).await?;
        Ok(response.cover_letter)
    }

    async fn save(&self, payload: &SavePayload) -> ClientResult<SavedRecord> {
        self.post_json(SAVE_ENDPOINT, payload).await
    }

    async fn list_saved(&self) -> ClientResult<Vec<SavedRecord>> {
        self.get(SAVED_ENDPOINT).await
    }

    async fn export_saved(&self) -> ClientResult<String> {
        let response: ExportResponse = self.get(EXPORT_ENDPOINT).await?;
        Ok(response.csv)
    }
}

/// Any non-2xx status is a failure carrying the body text
async fn read_response<R>(url: &str, response: reqwest::Response) -> ClientResult<R>
where
    R: DeserializeOwned,
{
    let status = response.status();
    app_log!(trace, "Response status from {}: {}", url, status);

    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        app_log!(error, "Job service error {} from {}: {}", status, url, body);
        return Err(ClientError::from_body(&body));
    }

    serde_json::from_str(&body).map_err(|e| {
        app_log!(error, "Failed to decode response from {}: {}", url, e);
        ClientError::Decode(e.to_string())
    })
}
