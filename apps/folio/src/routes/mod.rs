pub mod health;
pub mod pages;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers;
use crate::render::resume::PROFILE_IMAGE_PATH;
use crate::state::AppState;

/// Request body ceiling. Above the 5MB document limit so that an oversized
/// file, or its base64 form, still reaches validation and gets the size
/// message instead of a bare 413.
pub const REQUEST_BODY_LIMIT: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pages
        .route("/", get(pages::handle_index))
        .route("/pdf", get(pages::handle_print))
        .route("/upload", post(pages::handle_upload))
        .route(PROFILE_IMAGE_PATH, get(pages::serve_profile_image))
        // Resume API
        .route("/api/v1/resume", get(handlers::handle_get_resume))
        .route("/api/v1/resume/parse", post(handlers::handle_parse_resume))
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, HeaderValue, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::errors::EXTRACTION_FAILED_MESSAGE;
    use crate::extraction::extractor::stub::StubExtractor;
    use crate::extraction::extractor::LlmResumeExtractor;
    use crate::extraction::payload::{DataUri, DocumentKind, MAX_DOCUMENT_BYTES, PDF_MIME};
    use crate::llm_client::LlmClient;
    use crate::models::resume::ResumeRecord;
    use crate::state::SESSION_COOKIE;

    const BOUNDARY: &str = "folio-test-boundary";
    const PDF: &[u8] = b"%PDF-1.4 test";

    fn seeded() -> ResumeRecord {
        ResumeRecord {
            name: Some("Seed Person".to_string()),
            skills: Some(vec!["Rust".to_string()]),
            ..Default::default()
        }
    }

    fn test_state(stub: Arc<StubExtractor>) -> AppState {
        AppState::new(seeded(), stub)
    }

    /// One `resume` file part per entry: (file name, content type, bytes).
    fn upload_request(files: &[(&str, &str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (file_name, content_type, bytes) in files {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\n\
                     Content-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn pdf_upload() -> Request<Body> {
        upload_request(&[("cv.pdf", PDF_MIME, PDF)])
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn in_session(mut request: Request<Body>, session: Uuid) -> Request<Body> {
        request.headers_mut().insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE}={session}")).unwrap(),
        );
        request
    }

    /// The session id the response's `Set-Cookie` assigns.
    fn assigned_session(response: &Response) -> Uuid {
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("session cookie");
        let value = cookie
            .split(';')
            .next()
            .and_then(|pair| pair.strip_prefix(&format!("{SESSION_COOKIE}=")))
            .expect("folio_session pair");
        Uuid::parse_str(value).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn notice_count(html: &str) -> usize {
        html.matches("class=\"notice ").count()
    }

    #[tokio::test]
    async fn test_index_shows_seeded_resume() {
        let app = build_router(test_state(Arc::new(StubExtractor::failing())));
        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let html = body_text(response).await;
        assert!(html.contains("Seed Person"));
        assert!(html.contains("href=\"/pdf\""));
        assert!(html.contains("accept=\".pdf,.docx\""));
        assert!(html.contains("src=\"/profile.svg\""));
        assert_eq!(notice_count(&html), 0);
    }

    #[tokio::test]
    async fn test_profile_image_is_served() {
        let app = build_router(test_state(Arc::new(StubExtractor::failing())));
        let response = app.oneshot(get("/profile.svg")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        assert!(body_text(response).await.starts_with("<svg"));
    }

    #[tokio::test]
    async fn test_pdf_upload_replaces_resume_for_uploader() {
        let stub = Arc::new(StubExtractor::replying(
            r#"{ "name": "A. Test", "skills": ["Git"] }"#,
        ));
        let state = test_state(Arc::clone(&stub));
        let app = build_router(state.clone());

        let response = app.clone().oneshot(pdf_upload()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let session = assigned_session(&response);

        let html = body_text(response).await;
        assert!(html.contains("A. Test"));
        assert!(html.contains("<h4>Tools</h4>"));
        assert!(html.contains("Your resume has been parsed and updated."));
        assert!(!html.contains("Seed Person"));
        assert_eq!(stub.calls(), 1);

        // later page loads in the same session keep the parsed résumé
        let html = body_text(app.oneshot(in_session(get("/"), session)).await.unwrap()).await;
        assert!(html.contains("A. Test"));
        assert!(!state.uploader.is_busy(session));
    }

    #[tokio::test]
    async fn test_upload_is_invisible_to_other_visitors() {
        let stub = Arc::new(StubExtractor::replying(r#"{ "name": "Visitor A Upload" }"#));
        let app = build_router(test_state(stub));

        let response = app.clone().oneshot(pdf_upload()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let visitor_a = assigned_session(&response);

        // a visitor without a session
        let html = body_text(app.clone().oneshot(get("/")).await.unwrap()).await;
        assert!(html.contains("Seed Person"));
        assert!(!html.contains("Visitor A Upload"));

        // a visitor with a different session
        let visitor_b = Uuid::new_v4();
        let html = body_text(
            app.clone()
                .oneshot(in_session(get("/"), visitor_b))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Seed Person"));

        let response = app
            .clone()
            .oneshot(in_session(get("/api/v1/resume"), visitor_b))
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["name"], "Seed Person");

        // the uploader still sees their own
        let response = app
            .oneshot(in_session(get("/api/v1/resume"), visitor_a))
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["name"], "Visitor A Upload");
    }

    #[tokio::test]
    async fn test_upload_keeps_existing_session_cookie() {
        let stub = Arc::new(StubExtractor::replying(r#"{ "name": "A. Test" }"#));
        let app = build_router(test_state(stub));
        let session = Uuid::new_v4();

        let response = app.oneshot(in_session(pdf_upload(), session)).await.unwrap();
        assert_eq!(assigned_session(&response), session);
    }

    #[tokio::test]
    async fn test_failed_extraction_keeps_resume_and_shows_one_notice() {
        let stub = Arc::new(StubExtractor::failing());
        let state = test_state(Arc::clone(&stub));
        let app = build_router(state.clone());

        let response = app.oneshot(pdf_upload()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let session = assigned_session(&response);

        let html = body_text(response).await;
        assert!(html.contains("Seed Person"));
        assert!(html.contains("Uh oh! Something went wrong."));
        assert_eq!(notice_count(&html), 1);
        assert_eq!(stub.calls(), 1);
        assert_eq!(
            state.resume.get(Some(session)).name.as_deref(),
            Some("Seed Person")
        );
        assert!(!state.uploader.is_busy(session));
    }

    #[tokio::test]
    async fn test_unreachable_model_api_is_generic_failure() {
        let llm = LlmClient::new(
            "test-key".to_string(),
            "http://127.0.0.1:9/v1/messages".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        let state = AppState::new(seeded(), Arc::new(LlmResumeExtractor::new(llm)));
        let app = build_router(state.clone());

        let response = app.oneshot(pdf_upload()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let session = assigned_session(&response);

        let html = body_text(response).await;
        assert!(html.contains("There was a problem parsing your resume. Please try again."));
        assert_eq!(notice_count(&html), 1);
        assert_eq!(
            state.resume.get(Some(session)).name.as_deref(),
            Some("Seed Person")
        );
        assert_eq!(state.resume.session_count(), 0);
    }

    #[tokio::test]
    async fn test_text_file_rejected_without_extraction() {
        let stub = Arc::new(StubExtractor::replying("{}"));
        let app = build_router(test_state(Arc::clone(&stub)));

        let response = app
            .oneshot(upload_request(&[("notes.txt", "text/plain", b"hello")]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let html = body_text(response).await;
        assert!(html.contains(".pdf and .docx files are accepted."));
        assert!(html.contains("Seed Person"));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_file_over_five_mb_rejected_without_extraction() {
        let stub = Arc::new(StubExtractor::replying("{}"));
        let app = build_router(test_state(Arc::clone(&stub)));
        let oversized = vec![b'x'; MAX_DOCUMENT_BYTES + 1];

        let response = app
            .oneshot(upload_request(&[("cv.pdf", PDF_MIME, &oversized)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response)
            .await
            .contains("Max file size is 5MB."));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_body_over_request_limit_reports_size() {
        let stub = Arc::new(StubExtractor::replying("{}"));
        let app = build_router(test_state(Arc::clone(&stub)));
        let huge = vec![b'x'; REQUEST_BODY_LIMIT + 1];

        let response = app
            .oneshot(upload_request(&[("cv.pdf", PDF_MIME, &huge)]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response)
            .await
            .contains("Max file size is 5MB."));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_truncated_form_is_file_read_error() {
        let stub = Arc::new(StubExtractor::replying("{}"));
        let state = test_state(Arc::clone(&stub));
        let app = build_router(state.clone());

        // a non-file field whose body never reaches the closing boundary
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let session = assigned_session(&response);

        let html = body_text(response).await;
        assert!(html.contains("File Reading Error"));
        assert_eq!(stub.calls(), 0);
        assert!(!state.uploader.is_busy(session));
    }

    #[tokio::test]
    async fn test_missing_or_extra_files_rejected() {
        let stub = Arc::new(StubExtractor::replying("{}"));
        let app = build_router(test_state(Arc::clone(&stub)));

        let response = app.clone().oneshot(upload_request(&[])).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("File is required."));

        let response = app
            .oneshot(upload_request(&[
                ("a.pdf", PDF_MIME, b"%PDF-1.4 a"),
                ("b.pdf", PDF_MIME, b"%PDF-1.4 b"),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_while_session_busy_is_refused() {
        let stub = Arc::new(StubExtractor::replying(r#"{ "name": "A. Test" }"#));
        let state = test_state(Arc::clone(&stub));
        let app = build_router(state.clone());
        let busy_session = Uuid::new_v4();

        let guard = state.uploader.begin(busy_session).unwrap();
        let response = app
            .clone()
            .oneshot(in_session(pdf_upload(), busy_session))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(body_text(response).await.contains("Already parsing"));
        assert_eq!(stub.calls(), 0);

        // another visitor is not held up
        let response = app.oneshot(pdf_upload()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        drop(guard);

        assert_eq!(stub.calls(), 1);
        assert_eq!(
            state.resume.get(Some(busy_session)).name.as_deref(),
            Some("Seed Person")
        );
    }

    #[tokio::test]
    async fn test_print_page_uses_seeded_resume() {
        let stub = Arc::new(StubExtractor::replying(r#"{ "name": "A. Test" }"#));
        let app = build_router(test_state(stub));

        let response = app.clone().oneshot(pdf_upload()).await.unwrap();
        let session = assigned_session(&response);

        let html = body_text(
            app.oneshot(in_session(get("/pdf"), session))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Seed Person"));
        assert!(html.contains("window.print()"));
        assert!(!html.contains("<form"));
    }

    #[tokio::test]
    async fn test_parse_api_returns_record_without_replacing_display() {
        let stub = Arc::new(StubExtractor::replying(
            r#"{ "name": "A. Test", "email": "a@example.com" }"#,
        ));
        let state = test_state(Arc::clone(&stub));
        let app = build_router(state.clone());

        let uri = DataUri::from_bytes(DocumentKind::Pdf, PDF.to_vec())
            .unwrap()
            .to_uri();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resume/parse")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "resumeDataUri": uri }).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["name"], "A. Test");
        assert_eq!(body["email"], "a@example.com");
        assert!(body.get("phone").is_none());
        assert_eq!(state.resume.session_count(), 0);
    }

    #[tokio::test]
    async fn test_parse_api_rejects_bad_payloads() {
        let stub = Arc::new(StubExtractor::replying("{}"));
        let app = build_router(test_state(Arc::clone(&stub)));

        for uri in ["not a data uri", "data:text/plain;base64,aGVsbG8="] {
            let request = Request::builder()
                .method("POST")
                .uri("/api/v1/resume/parse")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "resumeDataUri": uri }).to_string()))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_parse_api_failure_is_generic() {
        let app = build_router(test_state(Arc::new(StubExtractor::failing())));
        let uri = DataUri::from_bytes(DocumentKind::Pdf, PDF.to_vec())
            .unwrap()
            .to_uri();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resume/parse")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "resumeDataUri": uri }).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["message"], EXTRACTION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_get_resume_and_health() {
        let app = build_router(test_state(Arc::new(StubExtractor::failing())));

        let response = app.clone().oneshot(get("/api/v1/resume")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["name"], "Seed Person");
        assert_eq!(body["skills"], json!(["Rust"]));

        let response = app.oneshot(get("/health")).await.unwrap();
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "folio");
    }
}
