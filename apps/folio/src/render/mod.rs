// HTML rendering: résumé layout, skill buckets, and the full pages around them.

pub mod page;
pub mod resume;
pub mod skills;

pub use page::{render_index_page, render_print_page, IndexView, Notice};
pub use skills::CategoryTable;

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
