//! The compiled-in résumé shown until a document is parsed.

use anyhow::{Context, Result};

use crate::models::resume::ResumeRecord;

const SEEDED_RESUME_JSON: &str = include_str!("../content/resume.json");

/// Parses the seeded résumé. Called once at startup; the result is injected
/// into `AppState`.
pub fn seeded_resume() -> Result<ResumeRecord> {
    serde_json::from_str(SEEDED_RESUME_JSON).context("content/resume.json is not a valid resume")
}
