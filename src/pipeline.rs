// src/pipeline.rs
//! Job intake: turn a résumé and a URL batch into scored jobs
//!
//! Bulk runs issue one `process_one` request per URL, strictly in order with one
//! request in flight, skipping URLs that already appear in the saved set. The first
//! failure aborts the run and nothing scored so far is returned.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::app_log;
use crate::core::JobService;
use crate::error::{ClientError, ClientResult};
use crate::session::{ResumeState, UrlBatch};
use crate::types::{CsvMeta, JobAnalysis, SavedRecord};

const MISSING_BATCH_INPUTS: &str = "Upload a resume and CSV before processing";
const MISSING_SINGLE_INPUTS: &str = "Upload a resume and enter a job URL before processing";

/// Bulk-processing progress indicator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub visible: bool,
    pub total: usize,
    pub current: usize,
}

impl ProgressState {
    pub fn started(total: usize) -> Self {
        Self {
            visible: true,
            total,
            current: 0,
        }
    }

    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkOutcome {
    pub jobs: Vec<JobAnalysis>,
    pub skipped: Vec<String>,
}

pub struct JobIntakePipeline<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S> JobIntakePipeline<'a, S>
where
    S: JobService + ?Sized,
{
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Score every URL not already saved, reporting progress after each one considered
    pub async fn run_bulk<F>(
        &self,
        resume: Option<&ResumeState>,
        batch: &UrlBatch,
        saved: &[SavedRecord],
        mut on_progress: F,
    ) -> ClientResult<BulkOutcome>
    where
        F: FnMut(ProgressState),
    {
        let resume_text = require_batch_inputs(resume, batch)?;
        let saved_urls: HashSet<&str> = saved.iter().map(|record| record.job.url.as_str()).collect();
        let total = batch.urls.len();

        app_log!(info, "Starting bulk intake over {} URLs", total);
        let mut progress = ProgressState::started(total);
        on_progress(progress);

        let mut jobs = Vec::new();
        let mut skipped = Vec::new();
        for (index, url) in batch.urls.iter().enumerate() {
            if saved_urls.contains(url.as_str()) {
                app_log!(info, "Skipping already saved job: {}", url);
                skipped.push(url.clone());
            } else {
                let meta = batch.meta_for(url);
                match self.service.process_one(resume_text, url, &meta).await {
                    Ok(analysis) => {
                        app_log!(
                            info,
                            "Scored {} -> {}% ({} missing skills)",
                            url,
                            analysis.fit_score,
                            analysis.missing_skills.len()
                        );
                        jobs.push(analysis);
                    }
                    Err(e) => {
                        app_log!(error, "Bulk intake aborted at {} ({}/{}): {}", url, index + 1, total, e);
                        return Err(e);
                    }
                }
            }

            progress.current = index + 1;
            progress.total = total;
            on_progress(progress);
        }

        app_log!(
            info,
            "Bulk intake finished: {} scored, {} skipped",
            jobs.len(),
            skipped.len()
        );
        Ok(BulkOutcome { jobs, skipped })
    }

    /// Send the whole batch to the service in one request
    pub async fn run_server_batch(
        &self,
        resume: Option<&ResumeState>,
        batch: &UrlBatch,
    ) -> ClientResult<Vec<JobAnalysis>> {
        let resume_text = require_batch_inputs(resume, batch)?;
        app_log!(info, "Submitting batch of {} URLs", batch.urls.len());
        self.service
            .process_jobs(resume_text, &batch.urls, &batch.meta)
            .await
    }

    /// Score one URL; CSV metadata is attached when the batch knows the URL
    pub async fn run_single(
        &self,
        resume: Option<&ResumeState>,
        url: &str,
        batch: &UrlBatch,
    ) -> ClientResult<JobAnalysis> {
        let url = url.trim();
        let resume_text = match resume {
            Some(resume) if !resume.text.is_empty() && !url.is_empty() => resume.text.as_str(),
            _ => return Err(ClientError::Validation(MISSING_SINGLE_INPUTS.to_string())),
        };

        let meta: CsvMeta = batch.meta_for(url);
        app_log!(info, "Scoring single job URL: {}", url);
        self.service.process_one(resume_text, url, &meta).await
    }
}

pub(crate) fn require_batch_inputs<'r>(
    resume: Option<&'r ResumeState>,
    batch: &UrlBatch,
) -> ClientResult<&'r str> {
    match resume {
        Some(resume) if !resume.text.is_empty() && !batch.urls.is_empty() => Ok(&resume.text),
        _ => Err(ClientError::Validation(MISSING_BATCH_INPUTS.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fake_service::{job_id_for, Call, FakeJobService};

    fn resume() -> ResumeState {
        ResumeState {
            text: "python sql airflow".to_string(),
            skills: vec!["python".to_string()],
        }
    }

    fn batch(urls: &[&str]) -> UrlBatch {
        UrlBatch {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            meta: Default::default(),
        }
    }

    async fn saved_from(service: &FakeJobService) -> Vec<SavedRecord> {
        service.list_saved().await.unwrap()
    }

    #[tokio::test]
    async fn test_bulk_scores_in_order_and_reports_progress() {
        let service = FakeJobService::new();
        let pipeline = JobIntakePipeline::new(&service);
        let mut events = Vec::new();

        let outcome = pipeline
            .run_bulk(Some(&resume()), &batch(&["u1", "u2"]), &[], |p| events.push(p))
            .await
            .unwrap();

        let urls: Vec<&str> = outcome.jobs.iter().map(|j| j.url()).collect();
        assert_eq!(urls, vec!["u1", "u2"]);
        assert_eq!(service.scored_urls(), vec!["u1", "u2"]);
        assert_eq!(
            events.iter().map(|p| p.current).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(events.iter().all(|p| p.total == 2 && p.visible));
    }

    #[tokio::test]
    async fn test_bulk_skips_saved_urls_but_advances_progress() {
        let service = FakeJobService::new().with_saved_urls(&["u1"]);
        let saved = saved_from(&service).await;
        let pipeline = JobIntakePipeline::new(&service);
        let mut events = Vec::new();

        let outcome = pipeline
            .run_bulk(Some(&resume()), &batch(&["u1", "u2"]), &saved, |p| {
                events.push(p.current)
            })
            .await
            .unwrap();

        assert_eq!(service.scored_urls(), vec!["u2"]);
        assert_eq!(outcome.jobs.len(), 1);
        assert_eq!(outcome.jobs[0].id(), job_id_for("u2"));
        assert_eq!(outcome.skipped, vec!["u1".to_string()]);
        assert_eq!(events, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_bulk_stops_at_first_failure() {
        let service = FakeJobService::new();
        service.fail_url("u2", "Could not fetch posting");
        let pipeline = JobIntakePipeline::new(&service);
        let mut last = ProgressState::default();

        let err = pipeline
            .run_bulk(Some(&resume()), &batch(&["u1", "u2", "u3"]), &[], |p| last = p)
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Could not fetch posting");
        assert_eq!(service.scored_urls(), vec!["u1", "u2"]);
        assert_eq!(last.current, 1);
    }

    #[tokio::test]
    async fn test_bulk_forwards_csv_meta() {
        let service = FakeJobService::new();
        let pipeline = JobIntakePipeline::new(&service);
        let mut urls = batch(&["u1"]);
        let meta = CsvMeta {
            benefits: Some("$150K/yr".to_string()),
            workplace_type: Some("hybrid".to_string()),
        };
        urls.meta.insert("u1".to_string(), meta.clone());

        pipeline
            .run_bulk(Some(&resume()), &urls, &[], |_| {})
            .await
            .unwrap();

        assert_eq!(
            service.calls(),
            vec![Call::ProcessOne {
                url: "u1".to_string(),
                meta
            }]
        );
    }

    #[tokio::test]
    async fn test_validation_errors_issue_no_requests() {
        let service = FakeJobService::new();
        let pipeline = JobIntakePipeline::new(&service);

        let missing_resume = pipeline
            .run_bulk(None, &batch(&["u1"]), &[], |_| {})
            .await
            .unwrap_err();
        assert!(missing_resume.is_validation());

        let missing_urls = pipeline
            .run_bulk(Some(&resume()), &batch(&[]), &[], |_| {})
            .await
            .unwrap_err();
        assert_eq!(missing_urls.user_message(), MISSING_BATCH_INPUTS);

        let blank_url = pipeline
            .run_single(Some(&resume()), "   ", &UrlBatch::default())
            .await
            .unwrap_err();
        assert!(blank_url.is_validation());

        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_trims_url() {
        let service = FakeJobService::new();
        let pipeline = JobIntakePipeline::new(&service);

        let job = pipeline
            .run_single(Some(&resume()), "  u9  ", &UrlBatch::default())
            .await
            .unwrap();

        assert_eq!(job.url(), "u9");
        assert_eq!(service.scored_urls(), vec!["u9"]);
    }

    #[tokio::test]
    async fn test_server_batch_sends_one_request() {
        let service = FakeJobService::new();
        let pipeline = JobIntakePipeline::new(&service);

        let jobs = pipeline
            .run_server_batch(Some(&resume()), &batch(&["u1", "u2"]))
            .await
            .unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(
            service.calls(),
            vec![Call::ProcessJobs(vec!["u1".to_string(), "u2".to_string()])]
        );
    }

    #[test]
    fn test_progress_fraction() {
        let mut progress = ProgressState::started(4);
        assert_eq!(progress.fraction(), 0.0);
        progress.current = 1;
        assert_eq!(progress.fraction(), 0.25);
        assert_eq!(ProgressState::default().fraction(), 0.0);
    }
}
