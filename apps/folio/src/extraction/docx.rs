//! Plain-text recovery for word-processing documents.
//!
//! The model API reads PDFs natively but not OOXML, so DOCX uploads are
//! flattened to text here before the call.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("failed to open DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to read {DOCUMENT_PART}: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed {DOCUMENT_PART}: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("DOCX contains no text")]
    Empty,
}

/// Extracts the body text of a DOCX file, one line per paragraph.
pub fn extract_text(data: &[u8]) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    let text = document_text(&xml)?;
    if text.trim().is_empty() {
        return Err(DocxError::Empty);
    }
    Ok(text)
}

fn document_text(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::with_capacity(xml.len() / 4);
    let mut in_text = false;
    // `w:tab` also names tab-stop definitions in paragraph properties; only
    // tabs inside a run are content.
    let mut in_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if in_run => out.push('\t'),
                b"br" | b"cr" if in_run => out.push('\n'),
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => out.push_str(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    // Collapse runs of blank paragraphs.
    let mut lines: Vec<&str> = Vec::new();
    for line in out.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    Ok(lines.join("\n"))
}
