//! Self-describing document payloads: `data:<mimetype>;base64,<encoded>`.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Largest document accepted for extraction, in decoded bytes.
pub const MAX_DOCUMENT_BYTES: usize = 5_000_000;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("data URI must look like 'data:<mimetype>;base64,<encoded_data>'")]
    Malformed,

    #[error("unsupported document type '{0}'; only PDF and DOCX are accepted")]
    UnsupportedType(String),

    #[error("document is {size} bytes; the limit is {MAX_DOCUMENT_BYTES}")]
    TooLarge { size: usize },

    #[error("document content is not valid base64: {0}")]
    Encoding(String),
}

/// The two document formats the extractor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Matches a MIME type exactly, ignoring ASCII case and parameters.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Some(Self::Pdf)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Some(Self::Docx)
        } else {
            None
        }
    }

    /// Guesses the kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if lower.ends_with(".docx") {
            Some(Self::Docx)
        } else {
            None
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::Docx => DOCX_MIME,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("pdf"),
            Self::Docx => f.write_str("docx"),
        }
    }
}

/// A decoded, size-checked document ready to hand to an extractor.
#[derive(Clone, PartialEq)]
pub struct DataUri {
    kind: DocumentKind,
    bytes: Vec<u8>,
}

impl DataUri {
    /// Wraps raw document bytes, enforcing the size ceiling.
    pub fn from_bytes(kind: DocumentKind, bytes: Vec<u8>) -> Result<Self, PayloadError> {
        if bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(PayloadError::TooLarge { size: bytes.len() });
        }
        Ok(Self { kind, bytes })
    }

    /// Parses `data:<mimetype>;base64,<encoded>`.
    ///
    /// The MIME type is checked before the content is decoded; the size
    /// ceiling applies to the decoded bytes.
    pub fn parse(uri: &str) -> Result<Self, PayloadError> {
        let rest = uri.trim().strip_prefix("data:").ok_or(PayloadError::Malformed)?;
        let (header, encoded) = rest.split_once(',').ok_or(PayloadError::Malformed)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(PayloadError::Malformed)?;
        if mime.is_empty() {
            return Err(PayloadError::Malformed);
        }
        let kind = DocumentKind::from_mime(mime)
            .ok_or_else(|| PayloadError::UnsupportedType(mime.to_string()))?;

        // base64 expands 3 bytes into 4 chars; reject obviously oversized input
        // before allocating the decoded buffer.
        if encoded.len() / 4 * 3 > MAX_DOCUMENT_BYTES + 3 {
            return Err(PayloadError::TooLarge {
                size: encoded.len() / 4 * 3,
            });
        }
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| PayloadError::Encoding(e.to_string()))?;

        Self::from_bytes(kind, bytes)
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn mime(&self) -> &'static str {
        self.kind.mime()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Renders the payload back into its `data:` form.
    #[cfg(test)]
    pub fn to_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime(), self.base64())
    }
}

impl fmt::Debug for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUri")
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .finish()
    }
}
