// src/session/state.rs
//! Serializable session state and its transitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::banner::StatusBanner;
use super::materials::{MaterialsEntry, MaterialsField};
use crate::pipeline::ProgressState;
use crate::types::{CsvMeta, GeneratedMaterials, JobAnalysis, SavedRecord, UrlMetaMap};

/// Parsed applicant résumé
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeState {
    pub text: String,
    pub skills: Vec<String>,
}

/// Pending postings to analyze, in CSV order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlBatch {
    pub urls: Vec<String>,
    #[serde(default)]
    pub meta: UrlMetaMap,
}

impl UrlBatch {
    pub fn meta_for(&self, url: &str) -> CsvMeta {
        self.meta.get(url).cloned().unwrap_or_default()
    }
}

/// Which operation is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Busy {
    Resume,
    Csv,
    Process,
    Generate(String),
    Save(String),
    Export,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingState {
    pub resume: bool,
    pub csv: bool,
    pub process: bool,
    pub generate_id: Option<String>,
    pub save_id: Option<String>,
    pub export_csv: bool,
}

impl LoadingState {
    fn set(&mut self, busy: Busy, on: bool) {
        match busy {
            Busy::Resume => self.resume = on,
            Busy::Csv => self.csv = on,
            Busy::Process => self.process = on,
            Busy::Generate(id) => self.generate_id = on.then_some(id),
            Busy::Save(id) => self.save_id = on.then_some(id),
            Busy::Export => self.export_csv = on,
        }
    }

    pub fn is_generating(&self, job_id: &str) -> bool {
        self.generate_id.as_deref() == Some(job_id)
    }

    pub fn is_saving(&self, job_id: &str) -> bool {
        self.save_id.as_deref() == Some(job_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Started(Busy),
    Finished(Busy),
    ResumeLoaded(ResumeState),
    UrlsLoaded(UrlBatch),
    ProgressUpdated(ProgressState),
    BulkCompleted(Vec<JobAnalysis>),
    JobPrepended(JobAnalysis),
    MaterialsFetched {
        job_id: String,
        materials: GeneratedMaterials,
    },
    DraftEdited {
        job_id: String,
        field: MaterialsField,
        text: String,
    },
    MaterialsClosed(String),
    MaterialsReopened(String),
    DescriptionToggled(String),
    SkillsToggled,
    RecordSaved(SavedRecord),
    SavedRefreshed(Vec<SavedRecord>),
    Exported,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub resume: Option<ResumeState>,
    #[serde(default)]
    pub url_batch: UrlBatch,
    #[serde(default)]
    pub jobs: Vec<JobAnalysis>,
    #[serde(default)]
    pub materials: HashMap<String, MaterialsEntry>,
    #[serde(default)]
    pub description_open: HashMap<String, bool>,
    #[serde(default)]
    pub skills_expanded: bool,
    #[serde(default)]
    pub saved: Vec<SavedRecord>,
    #[serde(default)]
    pub loading: LoadingState,
    #[serde(default)]
    pub progress: ProgressState,
    #[serde(default)]
    pub banner: StatusBanner,
}

impl SessionState {
    pub fn apply(&mut self, action: Action) {
        self.apply_at(action, Utc::now());
    }

    /// Apply one transition; `now` stamps any notice it posts
    pub fn apply_at(&mut self, action: Action, now: DateTime<Utc>) {
        match action {
            Action::Started(busy) => {
                self.banner.clear_error();
                if busy == Busy::Process {
                    self.progress = ProgressState::default();
                }
                self.loading.set(busy, true);
            }
            Action::Finished(busy) => {
                if busy == Busy::Process {
                    self.progress = ProgressState::default();
                }
                self.loading.set(busy, false);
            }
            Action::ResumeLoaded(resume) => {
                self.resume = Some(resume);
                self.banner.post_notice("Resume processed", now);
            }
            Action::UrlsLoaded(batch) => {
                let count = batch.urls.len();
                self.url_batch = batch;
                self.banner
                    .post_notice(format!("Loaded {} job URLs", count), now);
            }
            Action::ProgressUpdated(progress) => self.progress = progress,
            Action::BulkCompleted(jobs) => {
                self.jobs = jobs;
                self.materials.clear();
                self.banner.post_notice("Jobs analyzed", now);
            }
            Action::JobPrepended(job) => {
                self.jobs.insert(0, job);
                self.materials.clear();
                self.banner.post_notice("Job analyzed", now);
            }
            Action::MaterialsFetched { job_id, materials } => {
                match self.materials.get_mut(&job_id) {
                    Some(entry) => entry.refetched(materials),
                    None => {
                        self.materials
                            .insert(job_id, MaterialsEntry::fetched(materials));
                    }
                }
                self.banner.post_notice("Content generated", now);
            }
            Action::DraftEdited {
                job_id,
                field,
                text,
            } => {
                if let Some(entry) = self.materials.get_mut(&job_id) {
                    entry.edit(field, &text);
                }
            }
            Action::MaterialsClosed(job_id) => {
                if let Some(entry) = self.materials.get_mut(&job_id) {
                    entry.save_and_close();
                }
            }
            Action::MaterialsReopened(job_id) => {
                if let Some(entry) = self.materials.get_mut(&job_id) {
                    entry.reopen();
                }
            }
            Action::DescriptionToggled(job_id) => {
                let open = self.description_open.entry(job_id).or_insert(false);
                *open = !*open;
            }
            Action::SkillsToggled => self.skills_expanded = !self.skills_expanded,
            Action::RecordSaved(record) => {
                self.saved.push(record);
                self.banner.post_notice("Application saved", now);
            }
            Action::SavedRefreshed(records) => self.saved = records,
            Action::Exported => self.banner.post_notice("CSV exported", now),
            Action::Failed(message) => {
                self.progress = ProgressState::default();
                self.banner.set_error(message);
            }
        }
    }

    pub fn job(&self, job_id: &str) -> Option<&JobAnalysis> {
        self.jobs.iter().find(|analysis| analysis.id() == job_id)
    }

    pub fn materials_for(&self, job_id: &str) -> Option<&MaterialsEntry> {
        self.materials.get(job_id)
    }

    /// The copy a save would submit
    pub fn clean_materials(&self, job_id: &str) -> Option<&GeneratedMaterials> {
        self.materials.get(job_id).map(MaterialsEntry::clean)
    }

    pub fn is_description_open(&self, job_id: &str) -> bool {
        self.description_open.get(job_id).copied().unwrap_or(false)
    }

    pub fn resume_text(&self) -> &str {
        self.resume.as_ref().map(|r| r.text.as_str()).unwrap_or("")
    }

    /// A reload forgets in-flight work; nothing survives a restart mid-request
    pub fn reset_transient(&mut self) {
        self.loading = LoadingState::default();
        self.progress = ProgressState::default();
    }
}
