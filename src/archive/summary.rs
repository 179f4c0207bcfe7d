//! Homepage summary: the current haiku plus the archive count.

use std::time::Duration;

use tracing::error;

use crate::archive::content::render_document;
use crate::archive::loader::bounded;
use crate::archive::model::CurrentStatus;
use crate::archive::source::ArchiveSource;

/// Group digits with `,` separators: `12345` → `12,345`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn count_line(n: u64) -> String {
    format!("{} haiku in the hall", format_count(n))
}

/// What the summary view shows. Either part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub path_html: Option<String>,
    pub lines: Vec<String>,
    pub count_line: Option<String>,
}

/// Load the status document and the current haiku it points to.
///
/// Never fails: each part that cannot be loaded is logged and left empty.
pub async fn load_summary(source: &ArchiveSource, status_path: &str, limit: Duration) -> Summary {
    let status: CurrentStatus =
        match bounded(status_path, limit, source.fetch_json(status_path)).await {
            Ok(status) => status,
            Err(e) => {
                error!(path = %status_path, "Failed to load status: {}", e);
                return Summary::default();
            }
        };

    let mut summary = Summary {
        count_line: status.count().map(count_line),
        ..Default::default()
    };

    if let Some(path) = status.path_html() {
        summary.path_html = Some(path.to_string());
        match bounded(path, limit, source.fetch_text(path)).await {
            // Shown inside the summary frame, so always embedded.
            Ok(html) => summary.lines = render_document(&html, true),
            Err(e) => error!(path = %path, "Failed to load current haiku: {}", e),
        }
    }

    summary
}
