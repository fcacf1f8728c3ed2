// src/session/store.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::state::SessionState;
use crate::app_log;
use crate::core::FsOps;

/// Keeps the session between command invocations as pretty JSON
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, or a fresh one if none exists yet
    pub async fn load(&self) -> Result<SessionState> {
        if !self.path.exists() {
            app_log!(info, "No session at {}, starting fresh", self.path.display());
            return Ok(SessionState::default());
        }

        let content = FsOps::read_file_safe(&self.path).await?;
        let mut state: SessionState = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", self.path.display()))?;
        state.reset_transient();
        Ok(state)
    }

    pub async fn save(&self, state: &SessionState) -> Result<()> {
        let content =
            serde_json::to_string_pretty(state).context("Failed to serialize session state")?;
        FsOps::write_file_safe(&self.path, &content).await
    }
}
