//! Résumé layout: `ResumeRecord` to HTML fragment.
//!
//! Pure and source-agnostic. A section is emitted only when its sequence is
//! non-empty; contact items and profile links only when present.

use crate::models::resume::{entries, ResumeRecord};
use crate::render::html_escape;
use crate::render::skills::{categorize, CategoryTable};

/// Served by `GET /profile.svg`.
pub const PROFILE_IMAGE_PATH: &str = "/profile.svg";

/// Renders the résumé card.
pub fn render_resume(record: &ResumeRecord, table: &CategoryTable) -> String {
    let mut out = String::with_capacity(8192);

    out.push_str("<article class=\"resume\">\n");
    write_header(&mut out, record);

    if let Some(objective) = &record.objective {
        out.push_str(&format!(
            "<section class=\"objective\"><p>{}</p></section>\n",
            html_escape(objective)
        ));
    }

    out.push_str("<hr class=\"separator\">\n<div class=\"columns\">\n");

    out.push_str("<div class=\"main-column\">\n");
    write_experience(&mut out, record);
    write_projects(&mut out, record);
    write_list_section(&mut out, "achievements", "Achievements", entries(&record.achievements));
    out.push_str("</div>\n");

    out.push_str("<div class=\"side-column\">\n");
    write_education(&mut out, record);
    write_skills(&mut out, entries(&record.skills), table);
    write_list_section(
        &mut out,
        "certifications",
        "Certifications",
        entries(&record.certifications),
    );
    write_list_section(&mut out, "languages", "Languages", entries(&record.languages));
    out.push_str("</div>\n");

    out.push_str("</div>\n</article>\n");
    out
}

fn write_header(out: &mut String, record: &ResumeRecord) {
    let name = record.name.as_deref().unwrap_or("");
    let alt = if name.trim().is_empty() { "Profile Picture" } else { name };
    out.push_str("<header class=\"resume-header\">\n");
    out.push_str(&format!(
        "<img class=\"avatar\" src=\"{PROFILE_IMAGE_PATH}\" alt=\"{}\" width=\"128\" height=\"128\">\n",
        html_escape(alt)
    ));
    out.push_str("<div class=\"identity\">\n");
    out.push_str(&format!("<h1 class=\"name\">{}</h1>\n", html_escape(name)));

    let mut contacts = String::new();
    if let Some(email) = &record.email {
        contacts.push_str(&format!(
            "<a class=\"contact email\" href=\"mailto:{0}\">{0}</a>\n",
            html_escape(email)
        ));
    }
    if let Some(phone) = &record.phone {
        contacts.push_str(&format!(
            "<span class=\"contact phone\">{}</span>\n",
            html_escape(phone)
        ));
    }
    if let Some(location) = &record.location {
        contacts.push_str(&format!(
            "<span class=\"contact location\">{}</span>\n",
            html_escape(location)
        ));
    }
    if !contacts.is_empty() {
        out.push_str("<div class=\"contacts\">\n");
        out.push_str(&contacts);
        out.push_str("</div>\n");
    }

    let mut links = String::new();
    for (class, label, url) in [
        ("github", "GitHub", &record.github),
        ("linkedin", "LinkedIn", &record.linkedin),
    ] {
        if let Some(url) = url {
            links.push_str(&format!(
                "<a class=\"profile-link {}\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>\n",
                class,
                html_escape(url),
                label
            ));
        }
    }
    if !links.is_empty() {
        out.push_str("<div class=\"profile-links\">\n");
        out.push_str(&links);
        out.push_str("</div>\n");
    }

    out.push_str("</div>\n</header>\n");
}

fn open_section(out: &mut String, id: &str, title: &str) {
    out.push_str(&format!(
        "<section class=\"resume-section {id}\">\n<h2>{title}</h2>\n"
    ));
}

fn close_section(out: &mut String) {
    out.push_str("</section>\n");
}

/// Writes `<tag class="..">text</tag>` when the value is present.
fn write_opt(out: &mut String, tag: &str, class: &str, value: &Option<String>) {
    if let Some(value) = value {
        out.push_str(&format!(
            "<{tag} class=\"{class}\">{}</{tag}>\n",
            html_escape(value)
        ));
    }
}

fn write_experience(out: &mut String, record: &ResumeRecord) {
    let items = entries(&record.experience);
    if items.is_empty() {
        return;
    }
    open_section(out, "experience", "Experience");
    for exp in items {
        out.push_str("<div class=\"entry\">\n<div class=\"entry-heading\">\n");
        write_opt(out, "h3", "title", &exp.title);
        write_opt(out, "span", "dates", &exp.dates);
        out.push_str("</div>\n");
        write_opt(out, "p", "company", &exp.company);
        write_opt(out, "p", "description", &exp.description);
        out.push_str("</div>\n");
    }
    close_section(out);
}

fn write_projects(out: &mut String, record: &ResumeRecord) {
    let items = entries(&record.projects);
    if items.is_empty() {
        return;
    }
    open_section(out, "projects", "Projects");
    for project in items {
        out.push_str("<div class=\"entry\">\n");
        write_opt(out, "h3", "title", &project.name);
        write_opt(out, "p", "description", &project.description);
        out.push_str("</div>\n");
    }
    close_section(out);
}

fn write_education(out: &mut String, record: &ResumeRecord) {
    let items = entries(&record.education);
    if items.is_empty() {
        return;
    }
    open_section(out, "education", "Education");
    for edu in items {
        out.push_str("<div class=\"entry\">\n");
        write_opt(out, "h3", "title", &edu.degree);
        write_opt(out, "p", "institution", &edu.institution);

        let mut meta = Vec::new();
        if let Some(year) = &edu.graduation_year {
            meta.push(html_escape(year));
        }
        if let Some(cgpa) = &edu.cgpa {
            meta.push(format!("• CGPA: {}", html_escape(cgpa)));
        }
        if !meta.is_empty() {
            out.push_str(&format!("<p class=\"meta\">{}</p>\n", meta.join(" ")));
        }
        out.push_str("</div>\n");
    }
    close_section(out);
}

fn write_skills(out: &mut String, skills: &[String], table: &CategoryTable) {
    if skills.is_empty() {
        return;
    }
    open_section(out, "skills", "Skills");
    for bucket in categorize(skills, table) {
        out.push_str(&format!(
            "<div class=\"skill-group\">\n<h4>{}</h4>\n<div class=\"badges\">",
            html_escape(bucket.category)
        ));
        for skill in bucket.skills {
            out.push_str(&format!("<span class=\"badge\">{}</span>", html_escape(skill)));
        }
        out.push_str("</div>\n</div>\n");
    }
    close_section(out);
}

fn write_list_section(out: &mut String, id: &str, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    open_section(out, id, title);
    out.push_str("<ul>\n");
    for item in items {
        out.push_str(&format!("<li>{}</li>\n", html_escape(item)));
    }
    out.push_str("</ul>\n");
    close_section(out);
}
