// Résumé extraction: document payload, model call, schema-valid ResumeRecord.

pub mod docx;
pub mod extractor;
pub mod handlers;
pub mod payload;
pub mod prompts;
pub mod schema;
