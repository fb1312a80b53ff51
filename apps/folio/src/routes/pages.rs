//! HTML page handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
};
use axum_extra::extract::CookieJar;
use tracing::{error, warn};
use uuid::Uuid;

use crate::render::{render_index_page, render_print_page, IndexView, Notice};
use crate::state::{session_cookie, session_id, AppState};
use crate::upload::{select_files, UploadError};

const PROFILE_IMAGE_SVG: &[u8] = include_bytes!("../../content/profile.svg");

/// GET /
pub async fn handle_index(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    let record = state.resume.get(session_id(&jar));
    Html(render_index_page(
        &record,
        &state.categories,
        &IndexView::default(),
    ))
}

/// GET /pdf
///
/// Always the seeded résumé, whatever has been uploaded since.
pub async fn handle_print(State(state): State<AppState>) -> Html<String> {
    let record = state.resume.seeded();
    Html(render_print_page(&record, &state.categories))
}

/// GET /profile.svg
pub async fn serve_profile_image() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], PROFILE_IMAGE_SVG)
}

/// POST /upload
///
/// Parses the submitted document and re-renders the index page with the
/// outcome. A parsed résumé replaces only what the uploader's session sees;
/// every failure leaves it as it was.
pub async fn handle_upload(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> (StatusCode, CookieJar, Html<String>) {
    let session = session_id(&jar).unwrap_or_else(Uuid::new_v4);
    let jar = jar.add(session_cookie(session));

    let uploader = Arc::clone(&state.uploader);
    let outcome: Result<_, UploadError> = async {
        let busy = uploader.begin(session)?;
        let files = select_files(multipart).await?;
        uploader.submit(&busy, files).await
    }
    .await;

    let (status, view) = match outcome {
        Ok(_) => (
            StatusCode::OK,
            IndexView {
                notice: Some(Notice::parsed()),
                ..Default::default()
            },
        ),
        Err(UploadError::Invalid(rule)) => (
            StatusCode::BAD_REQUEST,
            IndexView {
                field_error: Some(rule.to_string()),
                ..Default::default()
            },
        ),
        Err(UploadError::FileRead(e)) => {
            warn!("Could not read uploaded file: {e}");
            (
                StatusCode::BAD_REQUEST,
                IndexView {
                    notice: Some(Notice::file_read_failed()),
                    ..Default::default()
                },
            )
        }
        Err(UploadError::Busy) => (
            StatusCode::CONFLICT,
            IndexView {
                notice: Some(Notice::busy()),
                ..Default::default()
            },
        ),
        Err(UploadError::Extraction(e)) => {
            error!("Extraction error: {e}");
            (
                StatusCode::BAD_GATEWAY,
                IndexView {
                    notice: Some(Notice::extraction_failed()),
                    ..Default::default()
                },
            )
        }
    };

    let record = state.resume.get(Some(session));
    (
        status,
        jar,
        Html(render_index_page(&record, &state.categories, &view)),
    )
}
