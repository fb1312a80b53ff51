// Résumé extraction prompt templates.

use super::schema::resume_schema;

/// System prompt for extraction calls: JSON only, nothing around it.
pub const RESUME_PARSE_SYSTEM: &str = "You extract structured data from documents. \
    Reply with a single JSON object and nothing else: \
    no markdown fences, no commentary, no apologies.";

const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: Only report what the document states. \
    If a field is not present in the document, omit the key entirely. \
    Do NOT guess, infer, or invent values.";

const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"You are an expert resume parser. Your job is to extract data from a resume document and return it in a structured JSON format.

Analyze the resume document attached above.

Return a JSON object conforming to the following JSON Schema:
```
{schema}
```

RULES:
1. Populate every field the resume provides, using the exact key names from the schema.
2. {no_fabrication}
3. "email" must be a valid email address; "github" and "linkedin" must be absolute URLs starting with http:// or https://.
4. Keep list items in the order they appear in the resume.
5. Return ONLY the JSON object. No introductory or explanatory text."#;

/// Builds the instruction text sent after the document block.
pub fn resume_parse_prompt() -> String {
    let schema = serde_json::to_string_pretty(&resume_schema()).unwrap_or_default();
    RESUME_PARSE_PROMPT_TEMPLATE
        .replace("{schema}", &schema)
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION.trim())
}
