// src/types/mod.rs
//! Wire types shared with the remote job service

pub mod job;
pub mod response;
pub mod saved;

pub use job::{CsvMeta, JobAnalysis, JobPosting, UrlMetaMap};
pub use saved::{GeneratedMaterials, SavePayload, SavedRecord};
