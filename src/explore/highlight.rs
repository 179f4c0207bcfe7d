//! Query highlighting over rendered rows.
//!
//! The query is a literal token-index key: file rows whose path is registered
//! under it are marked `Exact`, and every directory on their ancestor chain is
//! marked `Ancestor`. There is no substring matching.

use std::collections::HashSet;

use crate::explore::index::TokenIndex;
use crate::explore::tree::parent_path;
use crate::explore::view::Row;

/// Highlight state of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// A file whose path carries the query token.
    Exact,
    /// A directory containing an exact match somewhere below it.
    Ancestor,
}

/// Counts from one highlight pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightSummary {
    pub exact: usize,
    pub ancestors: usize,
}

/// Queries compare against lower-cased tokens.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

pub fn clear_highlight(rows: &mut [Row]) {
    for row in rows {
        row.mark = None;
    }
}

/// Replace all marks with those for `query`. An empty query only clears.
pub fn apply_highlight(query: &str, index: &TokenIndex, rows: &mut [Row]) -> HighlightSummary {
    clear_highlight(rows);

    let query = normalize_query(query);
    if query.is_empty() {
        return HighlightSummary::default();
    }
    let Some(hits) = index.lookup(&query) else {
        return HighlightSummary::default();
    };

    let mut summary = HighlightSummary::default();
    let mut ancestors: HashSet<&str> = HashSet::new();

    for row in rows.iter_mut().filter(|r| !r.is_dir()) {
        let Some(hit) = hits.get(row.path.as_str()) else {
            continue;
        };
        row.mark = Some(Mark::Exact);
        summary.exact += 1;

        let mut dir = parent_path(hit);
        while !dir.is_empty() && ancestors.insert(dir) {
            dir = parent_path(dir);
        }
    }

    for row in rows.iter_mut().filter(|r| r.is_dir()) {
        if ancestors.contains(row.path.as_str()) {
            row.mark = Some(Mark::Ancestor);
            summary.ancestors += 1;
        }
    }

    summary
}
