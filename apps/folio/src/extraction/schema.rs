//! Format rules for extracted résumés and the JSON Schema shown to the model.
//!
//! Type constraints are enforced by deserializing into [`ResumeRecord`]; this
//! module adds the string-format checks serde cannot express.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::resume::ResumeRecord;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_%+'-]+(?:\.[A-Za-z0-9_%+'-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .unwrap()
});

/// A single field that failed its format rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaViolation {
    pub field: &'static str,
    pub value: String,
    pub rule: &'static str,
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Absolute http(s) URL with a host.
pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Checks every format-constrained field. Returns all violations, not just the
/// first, so the log line explains the whole rejection.
pub fn validate_record(record: &ResumeRecord) -> Result<(), Vec<SchemaViolation>> {
    let mut violations = Vec::new();

    if let Some(email) = &record.email {
        if !is_valid_email(email) {
            violations.push(SchemaViolation {
                field: "email",
                value: email.clone(),
                rule: "email",
            });
        }
    }

    for (field, value) in [("github", &record.github), ("linkedin", &record.linkedin)] {
        if let Some(url) = value {
            if !is_valid_url(url) {
                violations.push(SchemaViolation {
                    field,
                    value: url.clone(),
                    rule: "url",
                });
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn optional_string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn string_list(description: &str) -> Value {
    json!({ "type": "array", "items": { "type": "string" }, "description": description })
}

/// JSON Schema for [`ResumeRecord`]. No property is required.
pub fn resume_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "name": optional_string("The name of the person."),
            "email": {
                "type": "string",
                "format": "email",
                "description": "The email address of the person."
            },
            "phone": optional_string("The phone number of the person."),
            "location": optional_string("The location of the person."),
            "github": {
                "type": "string",
                "format": "uri",
                "description": "The GitHub profile URL."
            },
            "linkedin": {
                "type": "string",
                "format": "uri",
                "description": "The LinkedIn profile URL."
            },
            "objective": optional_string("The objective or summary of the resume."),
            "education": {
                "type": "array",
                "description": "The education history of the person.",
                "items": {
                    "type": "object",
                    "properties": {
                        "degree": optional_string("The degree obtained."),
                        "institution": optional_string("The institution name."),
                        "graduationYear": optional_string("The graduation year."),
                        "cgpa": optional_string("The CGPA or GPA.")
                    }
                }
            },
            "skills": string_list("The skills of the person."),
            "projects": {
                "type": "array",
                "description": "The projects of the person.",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": optional_string("The name of the project."),
                        "description": optional_string("The description of the project.")
                    }
                }
            },
            "experience": {
                "type": "array",
                "description": "The work experience of the person.",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": optional_string("The job title."),
                        "company": optional_string("The company name."),
                        "dates": optional_string("The employment dates."),
                        "description": optional_string("The job description.")
                    }
                }
            },
            "certifications": string_list("The certifications of the person."),
            "languages": string_list("The languages spoken by the person."),
            "achievements": string_list("The achievements of the person.")
        }
    })
}
