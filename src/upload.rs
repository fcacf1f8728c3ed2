// src/upload.rs
//! Turns a selected file into a parsed résumé or URL batch

use std::path::Path;

use crate::app_log;
use crate::core::{FsOps, JobService, UploadFile};
use crate::error::{ClientError, ClientResult};
use crate::session::{ResumeState, UrlBatch};
use crate::utils::get_file_extension;

pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];
pub const CSV_EXTENSIONS: &[&str] = &["csv"];

pub struct UploadCoordinator<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S> UploadCoordinator<'a, S>
where
    S: JobService + ?Sized,
{
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    pub async fn resume_from_path(&self, path: &Path) -> ClientResult<ResumeState> {
        let file = FsOps::read_upload(path).await?;
        self.resume(file).await
    }

    pub async fn resume(&self, file: UploadFile) -> ClientResult<ResumeState> {
        validate_upload(&file, RESUME_EXTENSIONS)?;
        app_log!(info, "Uploading resume {} ({} bytes)", file.file_name, file.bytes.len());

        let parsed = self.service.upload_resume(file).await?;
        app_log!(info, "Resume parsed with {} skills", parsed.skills.len());
        Ok(ResumeState {
            text: parsed.text,
            skills: parsed.skills,
        })
    }

    pub async fn url_batch_from_path(&self, path: &Path) -> ClientResult<UrlBatch> {
        let file = FsOps::read_upload(path).await?;
        self.url_batch(file).await
    }

    pub async fn url_batch(&self, file: UploadFile) -> ClientResult<UrlBatch> {
        validate_upload(&file, CSV_EXTENSIONS)?;
        app_log!(info, "Uploading job CSV {}", file.file_name);

        let parsed = self.service.upload_csv(file).await?;
        app_log!(info, "CSV yielded {} job URLs", parsed.urls.len());
        Ok(UrlBatch {
            urls: parsed.urls,
            meta: parsed.meta,
        })
    }
}

fn validate_upload(file: &UploadFile, allowed: &[&str]) -> ClientResult<()> {
    if file.bytes.is_empty() {
        return Err(ClientError::Validation(format!(
            "{} is empty",
            file.file_name
        )));
    }

    match get_file_extension(&file.file_name) {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        _ => Err(ClientError::Validation(format!(
            "Unsupported file: {}. Allowed: {}",
            file.file_name,
            allowed.join(", ")
        ))),
    }
}
