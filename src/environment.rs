// src/environment.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::app_log;
use crate::export::DEFAULT_EXPORT_FILE;
use crate::session::banner::DEFAULT_NOTICE_TTL_MS;

pub const CONFIG_FILE: &str = "hiresignal.yaml";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;
pub const DEFAULT_SESSION_PATH: &str = ".hiresignal/session.json";
pub const DEFAULT_LOG_PATH: &str = "/tmp/hiresignal.log";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub timeout_seconds: u64,
    pub session_path: PathBuf,
    pub export_path: PathBuf,
    pub log_path: PathBuf,
    pub notice_ttl_ms: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            notice_ttl_ms: DEFAULT_NOTICE_TTL_MS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: ClientConfig,
    production: ClientConfig,
}

impl ClientConfig {
    /// Load configuration for the active profile; the file is optional
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        let mut config = Self::load_from_file(Path::new(CONFIG_FILE), &environment)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.api_base = normalize_base_url(&config.api_base);
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("HIRESIGNAL_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config_file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = lookup("HIRESIGNAL_API_BASE") {
            self.api_base = api_base;
        }
        if let Some(timeout) = lookup("HIRESIGNAL_TIMEOUT_SECS") {
            self.timeout_seconds = timeout
                .trim()
                .parse()
                .context("HIRESIGNAL_TIMEOUT_SECS must be a whole number of seconds")?;
        }
        if let Some(session) = lookup("HIRESIGNAL_SESSION") {
            self.session_path = PathBuf::from(session);
        }
        Ok(())
    }

    /// CLI flags win over file and environment
    pub fn with_overrides(mut self, api_base: Option<String>, session: Option<PathBuf>) -> Self {
        if let Some(api_base) = api_base {
            self.api_base = normalize_base_url(&api_base);
        }
        if let Some(session) = session {
            self.session_path = session;
        }
        app_log!(
            debug,
            "Using API {} with session {}",
            self.api_base,
            self.session_path.display()
        );
        self
    }
}

pub fn normalize_base_url(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}
