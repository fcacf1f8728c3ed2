// src/core/mod.rs
//! Remote job service access and shared file operations

pub mod fs_ops;
pub mod job_service;
pub mod service_client;

#[cfg(test)]
pub(crate) mod fake_service;

pub use fs_ops::FsOps;
pub use job_service::{GenerateRequest, JobService, UploadFile};
pub use service_client::ServiceClient;
