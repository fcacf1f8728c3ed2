// src/utils.rs
use regex::Regex;
use std::sync::LazyLock;

use crate::types::JobAnalysis;

/// Descriptions longer than this get a more/less toggle
pub const DESCRIPTION_PREVIEW_CHARS: usize = 240;

/// Number of résumé skills shown before "+more"
pub const SKILL_PREVIEW_COUNT: usize = 6;

const UNAVAILABLE: &str = "Unavailable";

static POSTED_STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Posted\s+\d{1,2}:\d{2}:\d{2}\s+(AM|PM)\.?\s*").expect("valid regex")
});

static LINKEDIN_BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)See this and similar jobs on LinkedIn\.?").expect("valid regex")
});

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Multipart content type for an upload, by extension
pub fn content_type_for(file_name: &str) -> &'static str {
    match get_file_extension(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

/// Optional posting fields render as "Unavailable" when absent or blank
pub fn display_or_unavailable(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => UNAVAILABLE,
    }
}

/// Strip posting timestamps and LinkedIn boilerplate from a description
pub fn sanitize_description(description: &str) -> String {
    let without_stamp = POSTED_STAMP.replace_all(description, "");
    LINKEDIN_BOILERPLATE
        .replace_all(&without_stamp, "")
        .trim()
        .to_string()
}

pub fn is_description_collapsible(description: &str) -> bool {
    description.chars().count() > DESCRIPTION_PREVIEW_CHARS
}

/// Rounded mean fit score, 0 for an empty list
pub fn fit_average(jobs: &[JobAnalysis]) -> u8 {
    if jobs.is_empty() {
        return 0;
    }
    let total: u32 = jobs.iter().map(|job| u32::from(job.fit_score)).sum();
    (f64::from(total) / jobs.len() as f64).round() as u8
}

/// Skills to show and how many stay hidden
pub fn skill_preview(skills: &[String], expanded: bool) -> (&[String], usize) {
    if expanded || skills.len() <= SKILL_PREVIEW_COUNT {
        (skills, 0)
    } else {
        (
            &skills[..SKILL_PREVIEW_COUNT],
            skills.len() - SKILL_PREVIEW_COUNT,
        )
    }
}
