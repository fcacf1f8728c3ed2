// src/export.rs
//! Save a single analyzed job, or pull the server-rendered CSV of everything saved

use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};

use crate::app_log;
use crate::core::{FsOps, JobService};
use crate::error::{ClientError, ClientResult};
use crate::types::{GeneratedMaterials, JobAnalysis, SavePayload, SavedRecord};

pub const DEFAULT_EXPORT_FILE: &str = "hiresignal_applications.csv";

pub struct ExportAdapter<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S> ExportAdapter<'a, S>
where
    S: JobService + ?Sized,
{
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Persist one job; every call issues a fresh request
    pub async fn save(
        &self,
        analysis: &JobAnalysis,
        materials: Option<&GeneratedMaterials>,
        now: DateTime<Utc>,
    ) -> ClientResult<SavedRecord> {
        let payload = build_save_payload(analysis, materials, now);
        app_log!(
            info,
            "Saving application for {} at {} (materials: {})",
            analysis.job.title,
            analysis.job.company,
            payload.generated.is_some()
        );
        self.service.save(&payload).await
    }

    /// Write the server's CSV rendering verbatim to `destination`
    pub async fn export_csv(&self, destination: &Path) -> ClientResult<PathBuf> {
        let csv = self.service.export_saved().await?;

        FsOps::write_file_safe(destination, &csv)
            .await
            .map_err(|e| ClientError::Io(std::io::Error::other(format!("{:#}", e))))?;

        app_log!(info, "Exported saved applications to {}", destination.display());
        Ok(destination.to_path_buf())
    }
}

/// Timestamp matches a browser ISO-8601 string, e.g. 2026-10-19T08:30:00.000Z
pub fn build_save_payload(
    analysis: &JobAnalysis,
    materials: Option<&GeneratedMaterials>,
    now: DateTime<Utc>,
) -> SavePayload {
    SavePayload {
        job: analysis.job.clone(),
        fit_score: analysis.fit_score,
        missing_skills: analysis.missing_skills.clone(),
        generated: materials.cloned(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fake_service::{analysis, materials, Call, FakeJobService};
    use chrono::TimeZone;

    #[test]
    fn test_payload_timestamp_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let payload = build_save_payload(&analysis("a", "u1", 80), None, now);

        assert_eq!(payload.timestamp, "2026-10-19T08:30:00.000Z");
        assert_eq!(payload.fit_score, 80);
        assert_eq!(payload.missing_skills, vec!["sql"]);
        assert!(payload.generated.is_none());
    }

    #[tokio::test]
    async fn test_save_returns_server_record() {
        let service = FakeJobService::new();
        let adapter = ExportAdapter::new(&service);
        let mats = materials("hi", "dear");

        let record = adapter
            .save(&analysis("a", "u1", 80), Some(&mats), Utc::now())
            .await
            .unwrap();

        assert_eq!(record.id, "saved-0");
        assert!(record.has_generated);
        assert_eq!(record.materials(), Some(&mats));
    }

    #[tokio::test]
    async fn test_repeated_saves_are_not_deduplicated() {
        let service = FakeJobService::new();
        let adapter = ExportAdapter::new(&service);
        let job = analysis("a", "u1", 80);

        adapter.save(&job, None, Utc::now()).await.unwrap();
        adapter.save(&job, None, Utc::now()).await.unwrap();

        let saves = service
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Save(_)))
            .count();
        assert_eq!(saves, 2);
    }

    #[tokio::test]
    async fn test_export_writes_csv_file() {
        let service = FakeJobService::new().with_saved_urls(&["u1"]);
        let adapter = ExportAdapter::new(&service);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(DEFAULT_EXPORT_FILE);

        let written = adapter.export_csv(&path).await.unwrap();

        let content = std::fs::read_to_string(&written).unwrap();
        assert!(content.starts_with("job_title,company,fit_score"));
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_export_failure_writes_nothing() {
        let service = FakeJobService::new();
        service.fail_endpoint("export", "");
        let adapter = ExportAdapter::new(&service);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);

        let err = adapter.export_csv(&path).await.unwrap_err();
        assert_eq!(err.user_message(), "Request failed");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_export_to_unwritable_path_is_io_error() {
        let service = FakeJobService::new().with_saved_urls(&["u1"]);
        let adapter = ExportAdapter::new(&service);
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let err = adapter
            .export_csv(&blocker.join(DEFAULT_EXPORT_FILE))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Io(_)));
        assert!(err.to_string().contains("Failed to"));
    }
}
