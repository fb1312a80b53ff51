//! Axum route handlers for the Resume API.

use axum::{extract::State, Json};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::errors::AppError;
use crate::extraction::payload::DataUri;
use crate::models::resume::ResumeRecord;
use crate::state::{session_id, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeRequest {
    /// `data:<mimetype>;base64,<encoded_data>`, PDF or DOCX.
    pub resume_data_uri: String,
}

/// GET /api/v1/resume
///
/// Returns the résumé the caller's session is shown.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Json<ResumeRecord> {
    Json(state.resume.get(session_id(&jar)).as_ref().clone())
}

/// POST /api/v1/resume/parse
///
/// Extracts a résumé from a document data URI. Does not change what the
/// site displays.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ResumeRecord>, AppError> {
    let payload = DataUri::parse(&request.resume_data_uri)?;
    let record = state.extractor.extract(&payload).await?;
    Ok(Json(record))
}
