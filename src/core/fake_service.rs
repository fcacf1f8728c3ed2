// src/core/fake_service.rs
//! Scripted in-memory job service for unit tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::job_service::{GenerateRequest, JobService, UploadFile};
use crate::error::{ClientError, ClientResult};
use crate::types::response::{CsvUploadResponse, ResumeUploadResponse};
use crate::types::{
    CsvMeta, GeneratedMaterials, JobAnalysis, JobPosting, SavePayload, SavedRecord, UrlMetaMap,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    UploadResume(String),
    UploadCsv(String),
    ProcessJobs(Vec<String>),
    ProcessOne { url: String, meta: CsvMeta },
    GenerateInmail(String),
    GenerateCoverLetter(String),
    Save(String),
    ListSaved,
    Export,
}

#[derive(Default)]
pub struct FakeJobService {
    calls: Mutex<Vec<Call>>,
    saved: Mutex<Vec<SavedRecord>>,
    failing_urls: Mutex<HashMap<String, String>>,
    failing_endpoints: Mutex<HashMap<&'static str, String>>,
    csv_urls: Mutex<Vec<String>>,
}

pub fn posting(id: &str, url: &str) -> JobPosting {
    JobPosting {
        id: id.to_string(),
        url: url.to_string(),
        title: format!("Role at {}", url),
        company: "Acme".to_string(),
        description: "Build things".to_string(),
        required_skills: vec!["python".to_string(), "sql".to_string()],
        location: None,
        salary: None,
        work_type: None,
        contact_person: None,
        posted_at: None,
        applicant_count: None,
    }
}

pub fn analysis(id: &str, url: &str, fit_score: u8) -> JobAnalysis {
    JobAnalysis {
        job: posting(id, url),
        fit_score,
        matched_skills: vec!["python".to_string()],
        missing_skills: vec!["sql".to_string()],
    }
}

pub fn job_id_for(url: &str) -> String {
    format!("job-{}", url)
}

impl FakeJobService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_saved_urls(self, urls: &[&str]) -> Self {
        {
            let mut saved = self.saved.lock().unwrap();
            for (index, url) in urls.iter().enumerate() {
                saved.push(SavedRecord {
                    id: format!("saved-{}", index),
                    job: posting(&job_id_for(url), url),
                    fit_score: 50,
                    missing_skills: vec![],
                    generated: None,
                    has_generated: false,
                    timestamp: "2026-01-01T00:00:00.000Z".to_string(),
                });
            }
        }
        self
    }

    pub fn with_csv_urls(self, urls: &[&str]) -> Self {
        *self.csv_urls.lock().unwrap() = urls.iter().map(|u| u.to_string()).collect();
        self
    }

    pub fn fail_url(&self, url: &str, body: &str) {
        self.failing_urls
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }

    pub fn fail_endpoint(&self, endpoint: &'static str, body: &str) {
        self.failing_endpoints
            .lock()
            .unwrap()
            .insert(endpoint, body.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing_urls.lock().unwrap().clear();
        self.failing_endpoints.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn scored_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ProcessOne { url, .. } => Some(url),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn endpoint_failure(&self, endpoint: &'static str) -> ClientResult<()> {
        match self.failing_endpoints.lock().unwrap().get(endpoint) {
            Some(body) => Err(ClientError::from_body(body)),
            None => Ok(()),
        }
    }

    fn score(&self, url: &str) -> ClientResult<JobAnalysis> {
        if let Some(body) = self.failing_urls.lock().unwrap().get(url) {
            return Err(ClientError::from_body(body));
        }
        Ok(analysis(&job_id_for(url), url, 70))
    }
}

#[async_trait]
impl JobService for FakeJobService {
    async fn upload_resume(&self, file: UploadFile) -> ClientResult<ResumeUploadResponse> {
        self.record(Call::UploadResume(file.file_name));
        self.endpoint_failure("resume")?;
        Ok(ResumeUploadResponse {
            text: String::from_utf8_lossy(&file.bytes).to_string(),
            skills: vec!["python".to_string(), "sql".to_string()],
        })
    }

    async fn upload_csv(&self, file: UploadFile) -> ClientResult<CsvUploadResponse> {
        self.record(Call::UploadCsv(file.file_name));
        self.endpoint_failure("csv")?;
        let urls = self.csv_urls.lock().unwrap().clone();
        let meta = urls
            .iter()
            .map(|url| {
                (
                    url.clone(),
                    CsvMeta {
                        benefits: Some("$120K/yr".to_string()),
                        workplace_type: Some("Remote".to_string()),
                    },
                )
            })
            .collect();
        Ok(CsvUploadResponse { urls, meta })
    }

    async fn process_jobs(
        &self,
        _resume_text: &str,
        urls: &[String],
        _url_meta: &UrlMetaMap,
    ) -> ClientResult<Vec<JobAnalysis>> {
        self.record(Call::ProcessJobs(urls.to_vec()));
        self.endpoint_failure("process")?;
        urls.iter().map(|url| self.score(url)).collect()
    }

    async fn process_one(
        &self,
        _resume_text: &str,
        url: &str,
        meta: &CsvMeta,
    ) -> ClientResult<JobAnalysis> {
        self.record(Call::ProcessOne {
            url: url.to_string(),
            meta: meta.clone(),
        });
        self.score(url)
    }

    async fn generate_inmail(&self, request: &GenerateRequest<'_>) -> ClientResult<String> {
        self.record(Call::GenerateInmail(request.job.id.clone()));
        self.endpoint_failure("inmail")?;
        Ok(format!("Hello {} hiring team", request.job.company))
    }

    async fn generate_cover_letter(&self, request: &GenerateRequest<'_>) -> ClientResult<String> {
        self.record(Call::GenerateCoverLetter(request.job.id.clone()));
        self.endpoint_failure("coverletter")?;
        Ok(format!("I am applying for {}", request.job.title))
    }

    async fn save(&self, payload: &SavePayload) -> ClientResult<SavedRecord> {
        self.record(Call::Save(payload.job.id.clone()));
        self.endpoint_failure("save")?;
        let mut saved = self.saved.lock().unwrap();
        let record = SavedRecord {
            id: format!("saved-{}", saved.len()),
            job: payload.job.clone(),
            fit_score: payload.fit_score,
            missing_skills: payload.missing_skills.clone(),
            generated: payload.generated.clone(),
            has_generated: payload.generated.is_some(),
            timestamp: payload.timestamp.clone(),
        };
        saved.push(record.clone());
        Ok(record)
    }

    async fn list_saved(&self) -> ClientResult<Vec<SavedRecord>> {
        self.record(Call::ListSaved);
        self.endpoint_failure("saved")?;
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn export_saved(&self) -> ClientResult<String> {
        self.record(Call::Export);
        self.endpoint_failure("export")?;
        let saved = self.saved.lock().unwrap();
        let mut lines = vec!["job_title,company,fit_score".to_string()];
        lines.extend(
            saved
                .iter()
                .map(|r| format!("\"{}\",\"{}\",{}", r.job.title, r.job.company, r.fit_score)),
        );
        Ok(lines.join("\n"))
    }
}

pub fn materials(inmail: &str, cover_letter: &str) -> GeneratedMaterials {
    GeneratedMaterials {
        inmail: inmail.to_string(),
        cover_letter: cover_letter.to_string(),
    }
}
