//! Extractor: turns a document payload into a schema-valid `ResumeRecord`.
//!
//! One model call per document. Any failure (transport, model, non-JSON
//! reply, type mismatch, format violation, empty reply) rejects the whole
//! call; nothing is salvaged field by field.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::extraction::docx::{self, DocxError};
use crate::extraction::payload::{DataUri, DocumentKind};
use crate::extraction::prompts::{resume_parse_prompt, RESUME_PARSE_SYSTEM};
use crate::extraction::schema::{validate_record, SchemaViolation};
use crate::llm_client::{parse_json_reply, InputBlock, LlmClient, LlmError};
use crate::models::resume::ResumeRecord;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("could not read document: {0}")]
    Document(#[from] DocxError),

    #[error("reply failed format validation: {}", describe_violations(.0))]
    Schema(Vec<SchemaViolation>),
}

fn describe_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} is not a valid {} ({:?})", v.field, v.rule, v.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The extraction capability. Swapped for a stub in tests.
///
/// Carried in `AppState` as `Arc<dyn ResumeExtractor>`.
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    async fn extract(&self, payload: &DataUri) -> Result<ResumeRecord, ExtractionError>;
}

/// Parses and validates raw model output into a record.
pub fn parse_model_reply(text: Option<&str>) -> Result<ResumeRecord, ExtractionError> {
    let record: ResumeRecord = parse_json_reply(text)?;
    validate_record(&record).map_err(ExtractionError::Schema)?;
    Ok(record)
}

/// Builds the user message: the document first, then the instructions.
pub fn build_content(payload: &DataUri) -> Result<Vec<InputBlock>, ExtractionError> {
    let document = match payload.kind() {
        DocumentKind::Pdf => InputBlock::base64_document(payload.mime(), payload.base64()),
        DocumentKind::Docx => InputBlock::text_document(docx::extract_text(payload.bytes())?),
    };
    Ok(vec![document, InputBlock::text(resume_parse_prompt())])
}

/// Claude-backed extractor.
pub struct LlmResumeExtractor {
    llm: LlmClient,
}

impl LlmResumeExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeExtractor for LlmResumeExtractor {
    async fn extract(&self, payload: &DataUri) -> Result<ResumeRecord, ExtractionError> {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            kind = %payload.kind(),
            bytes = payload.len(),
            "Extracting resume from document"
        );

        let result: Result<ResumeRecord, ExtractionError> = async {
            let content = build_content(payload)?;
            let response = self.llm.call(content, RESUME_PARSE_SYSTEM).await?;
            parse_model_reply(response.text())
        }
        .await;

        match &result {
            Ok(_) => info!(%request_id, "Resume extraction succeeded"),
            Err(e) => warn!(%request_id, "Resume extraction failed: {e}"),
        }
        result
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;

    use crate::extraction::docx::tests::docx_with_body;
    use crate::llm_client::fake_api;
    use crate::llm_client::DocumentSource;

    use super::*;

    fn extractor(url: String) -> LlmResumeExtractor {
        let llm = LlmClient::new("test-key".to_string(), url, Duration::from_secs(5)).unwrap();
        LlmResumeExtractor::new(llm)
    }

    fn pdf_payload() -> DataUri {
        DataUri::from_bytes(DocumentKind::Pdf, b"%PDF-1.4 test".to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_extract_parses_model_reply() {
        let url = fake_api::serve(
            StatusCode::OK,
            fake_api::text_reply(r#"{ "name": "A. Test", "skills": ["Git"] }"#),
        )
        .await;
        let record = extractor(url).extract(&pdf_payload()).await.unwrap();
        assert_eq!(record.name.as_deref(), Some("A. Test"));
        assert_eq!(record.skills, Some(vec!["Git".to_string()]));
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_reply() {
        let url = fake_api::serve(
            StatusCode::OK,
            fake_api::text_reply(r#"{ "name": "A. Test", "github": "github.com/atest" }"#),
        )
        .await;
        let err = extractor(url).extract(&pdf_payload()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Schema(_)));
    }

    #[tokio::test]
    async fn test_extract_surfaces_api_failure() {
        let url = fake_api::serve(
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "type": "error", "error": { "type": "api_error", "message": "boom" } }),
        )
        .await;
        let err = extractor(url).extract(&pdf_payload()).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Llm(LlmError::Api { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_extract_unreachable_api_is_transport_error() {
        let err = extractor("http://127.0.0.1:9/v1/messages".to_string())
            .extract(&pdf_payload())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Llm(LlmError::Http(_))));
    }

    #[test]
    fn test_parse_model_reply_minimal_record() {
        let record = parse_model_reply(Some(r#"{ "name": "A. Test", "skills": ["Git"] }"#)).unwrap();
        assert_eq!(record.name.as_deref(), Some("A. Test"));
        assert_eq!(record.skills, Some(vec!["Git".to_string()]));
        assert!(record.education.is_none());
    }

    #[test]
    fn test_parse_model_reply_accepts_fenced_json() {
        let record = parse_model_reply(Some("```json\n{\"name\": \"A. Test\"}\n```")).unwrap();
        assert_eq!(record.name.as_deref(), Some("A. Test"));
    }

    #[test]
    fn test_parse_model_reply_rejects_malformed_email_wholesale() {
        let err = parse_model_reply(Some(
            r#"{ "name": "A. Test", "email": "a.test at example", "skills": ["Git"] }"#,
        ))
        .unwrap_err();
        match err {
            ExtractionError::Schema(v) => assert_eq!(v[0].field, "email"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_model_reply_rejects_relative_url() {
        let err = parse_model_reply(Some(r#"{ "linkedin": "linkedin.com/in/someone" }"#))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Schema(_)));
    }

    #[test]
    fn test_parse_model_reply_rejects_wrong_types() {
        let err = parse_model_reply(Some(r#"{ "education": "BSc 2024" }"#)).unwrap_err();
        assert!(matches!(err, ExtractionError::Llm(LlmError::Parse(_))));
    }

    #[test]
    fn test_parse_model_reply_rejects_empty_output() {
        assert!(matches!(
            parse_model_reply(Some("")),
            Err(ExtractionError::Llm(LlmError::EmptyContent))
        ));
        assert!(matches!(
            parse_model_reply(None),
            Err(ExtractionError::Llm(LlmError::EmptyContent))
        ));
    }

    #[test]
    fn test_build_content_pdf_is_base64_document() {
        let payload = DataUri::from_bytes(DocumentKind::Pdf, b"%PDF-1.7".to_vec()).unwrap();
        let content = build_content(&payload).unwrap();
        assert_eq!(content.len(), 2);
        match &content[0] {
            InputBlock::Document {
                source: DocumentSource::Base64 { media_type, data },
            } => {
                assert_eq!(media_type, "application/pdf");
                assert_eq!(data, &payload.base64());
            }
            other => panic!("unexpected block {other:?}"),
        }
        assert!(matches!(&content[1], InputBlock::Text { text } if text.contains("resume parser")));
    }

    #[test]
    fn test_build_content_docx_is_text_document() {
        let docx = docx_with_body("<w:p><w:r><w:t>A. Test</w:t></w:r></w:p>");
        let payload = DataUri::from_bytes(DocumentKind::Docx, docx).unwrap();
        let content = build_content(&payload).unwrap();
        assert_eq!(content[0], InputBlock::text_document("A. Test".to_string()));
    }

    #[test]
    fn test_build_content_unreadable_docx_fails() {
        let payload = DataUri::from_bytes(DocumentKind::Docx, b"garbage".to_vec()).unwrap();
        assert!(matches!(
            build_content(&payload),
            Err(ExtractionError::Document(_))
        ));
    }

    #[tokio::test]
    async fn test_stub_failure_counts_calls() {
        let stub = stub::StubExtractor::failing();
        let payload = DataUri::from_bytes(DocumentKind::Pdf, b"%PDF".to_vec()).unwrap();
        assert!(stub.extract(&payload).await.is_err());
        assert_eq!(stub.calls(), 1);
    }
}
