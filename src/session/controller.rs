// src/session/controller.rs
//! Runs each user-initiated operation against the job service and records the outcome
//!
//! Every operation follows the same shape: mark its busy flag, call the service, apply
//! either the success transition or `Action::Failed`, then clear the busy flag on both paths.

use chrono::Utc;
use std::path::{Path, PathBuf};

use super::materials::MaterialsField;
use super::state::{Action, Busy, SessionState};
use crate::app_log;
use crate::core::job_service::generate_materials;
use crate::core::{GenerateRequest, JobService};
use crate::error::{ClientError, ClientResult};
use crate::export::ExportAdapter;
use crate::pipeline::{require_batch_inputs, BulkOutcome, JobIntakePipeline, ProgressState};
use crate::types::{JobAnalysis, SavedRecord};
use crate::upload::UploadCoordinator;

pub struct SessionController<S> {
    service: S,
    state: SessionState,
}

impl<S> SessionController<S>
where
    S: JobService,
{
    pub fn new(service: S, state: SessionState) -> Self {
        Self { service, state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn dispatch(&mut self, action: Action) {
        self.state.apply(action);
    }

    fn fail<T>(&mut self, err: ClientError) -> ClientResult<T> {
        app_log!(warn, "Operation failed: {}", err);
        self.dispatch(Action::Failed(err.user_message()));
        Err(err)
    }

    fn require_job(&mut self, job_id: &str) -> ClientResult<JobAnalysis> {
        match self.state.job(job_id) {
            Some(analysis) => Ok(analysis.clone()),
            None => self.fail(ClientError::UnknownJob(job_id.to_string())),
        }
    }

    /// Initial load: pull the saved list without surfacing failures
    pub async fn open(&mut self) {
        self.refresh_saved().await;
    }

    pub async fn upload_resume(&mut self, path: &Path) -> ClientResult<()> {
        self.dispatch(Action::Started(Busy::Resume));
        let result = UploadCoordinator::new(&self.service)
            .resume_from_path(path)
            .await;
        self.dispatch(Action::Finished(Busy::Resume));

        match result {
            Ok(resume) => {
                self.dispatch(Action::ResumeLoaded(resume));
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub async fn upload_csv(&mut self, path: &Path) -> ClientResult<()> {
        self.dispatch(Action::Started(Busy::Csv));
        let result = UploadCoordinator::new(&self.service)
            .url_batch_from_path(path)
            .await;
        self.dispatch(Action::Finished(Busy::Csv));

        match result {
            Ok(batch) => {
                self.dispatch(Action::UrlsLoaded(batch));
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Client-side loop over the loaded batch; the working list is only replaced on full success
    pub async fn process_bulk<F>(&mut self, mut observer: F) -> ClientResult<BulkOutcome>
    where
        F: FnMut(&ProgressState),
    {
        let precondition =
            require_batch_inputs(self.state.resume.as_ref(), &self.state.url_batch).map(|_| ());
        if let Err(e) = precondition {
            return self.fail(e);
        }
        self.refresh_saved().await;

        let resume = self.state.resume.clone();
        let batch = self.state.url_batch.clone();
        let saved = self.state.saved.clone();

        self.dispatch(Action::Started(Busy::Process));
        let state = &mut self.state;
        let result = JobIntakePipeline::new(&self.service)
            .run_bulk(resume.as_ref(), &batch, &saved, |progress| {
                state.apply(Action::ProgressUpdated(progress));
                observer(&progress);
            })
            .await;

        let outcome = match result {
            Ok(outcome) => {
                self.dispatch(Action::BulkCompleted(outcome.jobs.clone()));
                Ok(outcome)
            }
            Err(e) => self.fail(e),
        };
        self.dispatch(Action::Finished(Busy::Process));
        outcome
    }

    /// One `/jobs/process` request for the whole batch
    pub async fn process_server_batch(&mut self) -> ClientResult<usize> {
        let resume = self.state.resume.clone();
        let batch = self.state.url_batch.clone();

        self.dispatch(Action::Started(Busy::Process));
        let result = JobIntakePipeline::new(&self.service)
            .run_server_batch(resume.as_ref(), &batch)
            .await;

        let outcome = match result {
            Ok(jobs) => {
                let count = jobs.len();
                self.dispatch(Action::BulkCompleted(jobs));
                Ok(count)
            }
            Err(e) => self.fail(e),
        };
        self.dispatch(Action::Finished(Busy::Process));
        outcome
    }

    /// Score one URL and put it at the front of the working list
    pub async fn process_url(&mut self, url: &str) -> ClientResult<String> {
        let resume = self.state.resume.clone();

        self.dispatch(Action::Started(Busy::Process));
        let result = JobIntakePipeline::new(&self.service)
            .run_single(resume.as_ref(), url, &self.state.url_batch)
            .await;

        let outcome = match result {
            Ok(analysis) => {
                let job_id = analysis.id().to_string();
                self.dispatch(Action::JobPrepended(analysis));
                Ok(job_id)
            }
            Err(e) => self.fail(e),
        };
        self.dispatch(Action::Finished(Busy::Process));
        outcome
    }

    /// InMail and cover letter are requested together; both must succeed
    pub async fn generate(&mut self, job_id: &str) -> ClientResult<()> {
        let analysis = self.require_job(job_id)?;
        let resume_text = self.state.resume_text().to_string();
        let busy = Busy::Generate(job_id.to_string());

        self.dispatch(Action::Started(busy.clone()));
        let request = GenerateRequest {
            job: &analysis.job,
            resume_text: &resume_text,
            matched_skills: &analysis.matched_skills,
        };
        let result = generate_materials(&self.service, &request).await;
        self.dispatch(Action::Finished(busy));

        match result {
            Ok(materials) => {
                self.dispatch(Action::MaterialsFetched {
                    job_id: job_id.to_string(),
                    materials,
                });
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn edit_draft(&mut self, job_id: &str, field: MaterialsField, text: &str) -> ClientResult<()> {
        match self.state.materials_for(job_id).map(|entry| entry.is_open()) {
            None => {
                return self.fail(ClientError::Validation(format!(
                    "Generate materials for job {} before editing",
                    job_id
                )))
            }
            Some(false) => {
                return self.fail(ClientError::Validation(format!(
                    "Reopen the materials for job {} before editing",
                    job_id
                )))
            }
            Some(true) => {}
        }

        self.dispatch(Action::DraftEdited {
            job_id: job_id.to_string(),
            field,
            text: text.to_string(),
        });
        Ok(())
    }

    /// The only way draft edits reach the copy used for saving
    pub fn save_and_close(&mut self, job_id: &str) -> ClientResult<()> {
        if self.state.materials_for(job_id).is_none() {
            return self.fail(ClientError::Validation(format!(
                "No materials generated for job {}",
                job_id
            )));
        }
        self.dispatch(Action::MaterialsClosed(job_id.to_string()));
        Ok(())
    }

    pub fn reopen(&mut self, job_id: &str) -> ClientResult<()> {
        if self.state.materials_for(job_id).is_none() {
            return self.fail(ClientError::Validation(format!(
                "No materials generated for job {}",
                job_id
            )));
        }
        self.dispatch(Action::MaterialsReopened(job_id.to_string()));
        Ok(())
    }

    pub fn toggle_description(&mut self, job_id: &str) {
        self.dispatch(Action::DescriptionToggled(job_id.to_string()));
    }

    /// Open the full description; a no-op when it is already open
    pub fn expand_description(&mut self, job_id: &str) {
        if !self.state.is_description_open(job_id) {
            self.toggle_description(job_id);
        }
    }

    pub fn toggle_skills(&mut self) {
        self.dispatch(Action::SkillsToggled);
    }

    /// Submit the job with its clean materials copy, if any
    pub async fn save(&mut self, job_id: &str) -> ClientResult<SavedRecord> {
        let analysis = self.require_job(job_id)?;
        let materials = self.state.clean_materials(job_id).cloned();
        let busy = Busy::Save(job_id.to_string());

        self.dispatch(Action::Started(busy.clone()));
        let result = ExportAdapter::new(&self.service)
            .save(&analysis, materials.as_ref(), Utc::now())
            .await;
        self.dispatch(Action::Finished(busy));

        match result {
            Ok(record) => {
                self.dispatch(Action::RecordSaved(record.clone()));
                Ok(record)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Replace the saved list; failures are logged only
    pub async fn refresh_saved(&mut self) -> bool {
        match self.service.list_saved().await {
            Ok(records) => {
                app_log!(info, "Loaded {} saved applications", records.len());
                self.dispatch(Action::SavedRefreshed(records));
                true
            }
            Err(e) => {
                app_log!(warn, "Failed to load saved items: {}", e);
                false
            }
        }
    }

    pub async fn export(&mut self, destination: &Path) -> ClientResult<PathBuf> {
        self.dispatch(Action::Started(Busy::Export));
        let result = ExportAdapter::new(&self.service)
            .export_csv(destination)
            .await;
        self.dispatch(Action::Finished(Busy::Export));

        match result {
            Ok(path) => {
                self.dispatch(Action::Exported);
                Ok(path)
            }
            Err(e) => self.fail(e),
        }
    }
}
