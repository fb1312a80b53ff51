//! Upload controller: form upload, validated payload, extraction, then state.
//!
//! Flow per submission:
//! 1. `begin` marks the visitor's session busy (one parse per session).
//! 2. `select_files` reads the `resume` form field(s) into memory.
//! 3. `submit` validates count, size and type, then calls the extractor and,
//!    on success, replaces the résumé shown to that session.
//!
//! Validation failures never reach the extractor. Extraction failures leave
//! the displayed résumé untouched.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::extraction::extractor::{ExtractionError, ResumeExtractor};
use crate::extraction::payload::{DataUri, DocumentKind, MAX_DOCUMENT_BYTES};
use crate::models::resume::ResumeRecord;
use crate::state::ResumeStore;

/// Name of the file input in the upload form.
pub const FILE_FIELD: &str = "resume";

/// Why a selection was refused before any extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FileRule {
    #[error("File is required.")]
    Required,

    #[error("Max file size is 5MB.")]
    TooLarge,

    #[error(".pdf and .docx files are accepted.")]
    UnsupportedType,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    Invalid(FileRule),

    #[error("failed to read uploaded file: {0}")]
    FileRead(String),

    #[error("a resume is already being parsed for this session")]
    Busy,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// A file taken from the upload form.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub file_name: String,
    /// Browser-declared MIME type, if any.
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl SelectedFile {
    /// Declared type first; the extension only when the browser sent none.
    fn kind(&self) -> Option<DocumentKind> {
        match self.content_type.as_deref() {
            Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => {
                DocumentKind::from_mime(mime)
            }
            _ => DocumentKind::from_file_name(&self.file_name),
        }
    }
}

/// Reads every file submitted under [`FILE_FIELD`]. Other fields are drained
/// and ignored. Empty file inputs (no name, no bytes) are skipped.
pub async fn select_files(mut multipart: Multipart) -> Result<Vec<SelectedFile>, UploadError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        if field.name() != Some(FILE_FIELD) {
            field.bytes().await.map_err(read_error)?;
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(read_error)?;

        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        files.push(SelectedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Ok(files)
}

/// A body cut off by the request size limit is an oversized file, not a
/// read failure.
fn read_error(e: MultipartError) -> UploadError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::Invalid(FileRule::TooLarge)
    } else {
        UploadError::FileRead(e.body_text())
    }
}

/// Checks a selection: exactly one file, within the size ceiling, PDF or DOCX.
pub fn validate_selection(files: &[SelectedFile]) -> Result<(&SelectedFile, DocumentKind), FileRule> {
    let [file] = files else {
        return Err(FileRule::Required);
    };
    if file.bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(FileRule::TooLarge);
    }
    let kind = file.kind().ok_or(FileRule::UnsupportedType)?;
    Ok((file, kind))
}

fn lock(busy: &Mutex<HashSet<Uuid>>) -> MutexGuard<'_, HashSet<Uuid>> {
    busy.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Proof that a session's submission is in flight. Clears the mark on drop.
pub struct BusyGuard<'a> {
    busy: &'a Mutex<HashSet<Uuid>>,
    session: Uuid,
}

impl BusyGuard<'_> {
    pub fn session(&self) -> Uuid {
        self.session
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        lock(self.busy).remove(&self.session);
    }
}

pub struct UploadController {
    extractor: Arc<dyn ResumeExtractor>,
    resume: Arc<ResumeStore>,
    /// Sessions with a submission in flight.
    busy: Mutex<HashSet<Uuid>>,
}

impl UploadController {
    pub fn new(extractor: Arc<dyn ResumeExtractor>, resume: Arc<ResumeStore>) -> Self {
        Self {
            extractor,
            resume,
            busy: Mutex::new(HashSet::new()),
        }
    }

    /// Marks `session` busy, or fails if it already has a submission in flight.
    pub fn begin(&self, session: Uuid) -> Result<BusyGuard<'_>, UploadError> {
        if !lock(&self.busy).insert(session) {
            return Err(UploadError::Busy);
        }
        Ok(BusyGuard {
            busy: &self.busy,
            session,
        })
    }

    #[cfg(test)]
    pub fn is_busy(&self, session: Uuid) -> bool {
        lock(&self.busy).contains(&session)
    }

    /// Validates the selection, extracts, and replaces the résumé shown to
    /// the guard's session.
    pub async fn submit(
        &self,
        busy: &BusyGuard<'_>,
        files: Vec<SelectedFile>,
    ) -> Result<Arc<ResumeRecord>, UploadError> {
        let (file, kind) = validate_selection(&files).map_err(|rule| {
            warn!("Upload rejected: {rule}");
            UploadError::Invalid(rule)
        })?;

        let payload = DataUri::from_bytes(kind, file.bytes.to_vec())
            .map_err(|_| UploadError::Invalid(FileRule::TooLarge))?;

        info!(
            "Parsing uploaded resume '{}' ({}, {} bytes)",
            file.file_name,
            kind,
            payload.len()
        );
        let record = self.extractor.extract(&payload).await?;

        let record = self.resume.replace(busy.session(), record);
        info!(session = %busy.session(), "Displayed resume replaced by parsed upload");
        Ok(record)
    }
}
