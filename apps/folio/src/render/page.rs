//! Full HTML documents: the résumé page with its upload form, and the print page.

use crate::models::resume::ResumeRecord;
use crate::render::html_escape;
use crate::render::resume::render_resume;
use crate::render::skills::CategoryTable;

const STYLE: &str = r#"<style>
:root {
  --bg: #f4f6fb;
  --card: #ffffff;
  --text: #1f2937;
  --dim: #6b7280;
  --primary: #3b5bdb;
  --border: #e5e7eb;
  --danger: #c92a2a;
  --success: #2b8a3e;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  background: var(--bg);
  color: var(--text);
  line-height: 1.6;
  padding: 2.5rem 1rem;
}
main { max-width: 64rem; margin: 0 auto; }
.toolbar { display: flex; justify-content: space-between; align-items: flex-start; gap: 1.5rem; margin-bottom: 1.5rem; flex-wrap: wrap; }
.button { display: inline-block; background: var(--primary); color: #fff; border: none; border-radius: 0.4rem; padding: 0.55rem 1.1rem; font-size: 0.95rem; text-decoration: none; cursor: pointer; }
.button[disabled] { opacity: 0.6; cursor: progress; }
.uploader { background: var(--card); border: 1px solid var(--border); border-radius: 0.5rem; padding: 1rem; min-width: 18rem; }
.uploader label { display: block; font-weight: 600; margin-bottom: 0.4rem; }
.uploader input[type=file] { display: block; margin-bottom: 0.6rem; }
.field-error { color: var(--danger); font-size: 0.85rem; margin-bottom: 0.6rem; }
.notice { border-radius: 0.5rem; padding: 0.8rem 1rem; margin-bottom: 1.5rem; border: 1px solid var(--border); background: var(--card); }
.notice-error { border-color: var(--danger); color: var(--danger); }
.notice-success { border-color: var(--success); color: var(--success); }
.resume { background: var(--card); border-radius: 0.75rem; box-shadow: 0 10px 30px rgba(0,0,0,0.08); padding: 3rem; }
.resume-header { display: flex; align-items: center; gap: 1.5rem; }
.avatar { border-radius: 50%; border: 4px solid #e0e7ff; object-fit: cover; flex-shrink: 0; }
.resume-header .name { color: var(--primary); font-size: 2.25rem; }
.contacts, .profile-links { display: flex; flex-wrap: wrap; gap: 0.5rem 1rem; color: var(--dim); font-size: 0.9rem; margin-top: 0.5rem; }
.contacts a, .profile-links a { color: inherit; }
.objective p { font-style: italic; margin-top: 1.5rem; }
.separator { border: none; border-top: 1px solid var(--border); margin: 2rem 0; }
.columns { display: grid; grid-template-columns: 2fr 1fr; gap: 2rem 3rem; }
.resume-section { margin-bottom: 2rem; }
.resume-section h2 { color: var(--primary); font-size: 1.25rem; margin-bottom: 1rem; }
.entry { margin-bottom: 1rem; }
.entry-heading { display: flex; justify-content: space-between; align-items: baseline; gap: 1rem; }
.entry h3 { font-size: 1.05rem; }
.dates, .meta { color: var(--dim); font-size: 0.8rem; }
.company, .institution { color: var(--primary); font-weight: 600; font-size: 0.9rem; }
.description, .resume-section li { font-size: 0.9rem; }
.resume-section ul { list-style: disc inside; }
.skill-group h4 { font-size: 0.9rem; margin-bottom: 0.4rem; }
.skill-group { margin-bottom: 0.8rem; }
.badges { display: flex; flex-wrap: wrap; gap: 0.4rem; }
.badge { background: var(--bg); border-radius: 999px; padding: 0.1rem 0.6rem; font-size: 0.8rem; }
@media (max-width: 768px) { .columns { grid-template-columns: 1fr; } .resume { padding: 1.5rem; } }
@media print {
  body { background: #fff; padding: 0; }
  .no-print { display: none !important; }
  .resume { box-shadow: none; padding: 2rem; }
}
</style>"#;

/// Severity of a page notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

/// A one-shot notification shown above the résumé.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub tone: Tone,
    pub title: &'static str,
    pub description: &'static str,
}

impl Notice {
    pub fn parsed() -> Self {
        Self {
            tone: Tone::Success,
            title: "Success!",
            description: "Your resume has been parsed and updated.",
        }
    }

    pub fn extraction_failed() -> Self {
        Self {
            tone: Tone::Error,
            title: "Uh oh! Something went wrong.",
            description: "There was a problem parsing your resume. Please try again.",
        }
    }

    pub fn file_read_failed() -> Self {
        Self {
            tone: Tone::Error,
            title: "File Reading Error",
            description: "Could not read the selected file.",
        }
    }

    pub fn busy() -> Self {
        Self {
            tone: Tone::Error,
            title: "Already parsing",
            description: "A resume is already being parsed. Please wait for it to finish.",
        }
    }
}

/// Per-request state of the index page around the résumé itself.
#[derive(Debug, Clone, Default)]
pub struct IndexView {
    pub notice: Option<Notice>,
    /// Inline validation message next to the file input.
    pub field_error: Option<String>,
}

fn document(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n{}\n{}</head>\n<body>\n{}</body>\n</html>\n",
        html_escape(title),
        STYLE,
        head_extra,
        body
    )
}

fn page_title(record: &ResumeRecord) -> String {
    match record.name.as_deref() {
        Some(name) if !name.trim().is_empty() => format!("{name} | Resume"),
        _ => "Resume".to_string(),
    }
}

fn write_notice(out: &mut String, notice: &Notice) {
    let (class, role) = match notice.tone {
        Tone::Success => ("notice-success", "status"),
        Tone::Error => ("notice-error", "alert"),
    };
    out.push_str(&format!(
        "<div class=\"notice {class} no-print\" role=\"{role}\"><strong>{}</strong><p>{}</p></div>\n",
        notice.title, notice.description
    ));
}

fn write_uploader(out: &mut String, field_error: Option<&str>) {
    // A fresh form on every render leaves the file input empty, so the same
    // file can be selected again after a parse.
    out.push_str(
        "<form class=\"uploader\" method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\" \
         onsubmit=\"var b=this.querySelector('button');b.disabled=true;b.textContent='Parsing...';\">\n\
         <label for=\"resume\">Upload Resume</label>\n\
         <input type=\"file\" id=\"resume\" name=\"resume\" accept=\".pdf,.docx\">\n",
    );
    if let Some(message) = field_error {
        out.push_str(&format!(
            "<p class=\"field-error\" role=\"alert\">{}</p>\n",
            html_escape(message)
        ));
    }
    out.push_str("<button class=\"button\" type=\"submit\">Parse with AI</button>\n</form>\n");
}

/// The main page: toolbar, upload form, optional notice, résumé.
pub fn render_index_page(record: &ResumeRecord, table: &CategoryTable, view: &IndexView) -> String {
    let mut body = String::with_capacity(16384);
    body.push_str("<main>\n<div class=\"toolbar no-print\">\n");
    body.push_str(
        "<a class=\"button\" href=\"/pdf\" target=\"_blank\" rel=\"noopener\">Download PDF</a>\n",
    );
    write_uploader(&mut body, view.field_error.as_deref());
    body.push_str("</div>\n");

    if let Some(notice) = &view.notice {
        write_notice(&mut body, notice);
    }

    body.push_str(&render_resume(record, table));
    body.push_str("</main>\n");

    document(&page_title(record), "", &body)
}

/// The print page: the résumé alone, opening the browser's print dialog on load.
pub fn render_print_page(record: &ResumeRecord, table: &CategoryTable) -> String {
    let mut body = String::with_capacity(8192);
    body.push_str("<main>\n");
    body.push_str(&render_resume(record, table));
    body.push_str("</main>\n");

    document(
        &page_title(record),
        "<script>window.addEventListener('load', function () { window.print(); });</script>\n",
        &body,
    )
}
