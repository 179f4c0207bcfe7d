//! Rendered rows of the archive tree and their collapse state.
//!
//! Rows are rebuilt wholesale from the tree. A directory row is either
//! expanded or collapsed; toggling changes only that row's state, and a row is
//! visible exactly when every ancestor directory is expanded, so nested
//! directories keep their own state across an ancestor's collapse.

use crate::archive::model::ManifestEntry;
use crate::explore::highlight::Mark;
use crate::explore::tree::{parent_path, DirectoryNode, NodeType, TreeNode};

/// Directories shallower than this start expanded; the rest start collapsed.
pub const DEFAULT_OPEN_DEPTH: usize = 1;

/// One rendered node. The root's direct children are at depth 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub path: String,
    pub parent_path: String,
    pub node_type: NodeType,
    pub depth: usize,
    /// Only meaningful for directories.
    pub collapsed: bool,
    pub is_last_sibling: bool,
    /// One flag per ancestor, outermost first: true while that ancestor has
    /// siblings still to come, so its connector line continues past this row.
    pub guides: Vec<bool>,
    pub mark: Option<Mark>,
    /// The manifest entry behind a file row.
    pub entry: Option<ManifestEntry>,
}

impl Row {
    pub fn is_dir(&self) -> bool {
        self.node_type == NodeType::Directory
    }
}

/// State for the tree panel.
#[derive(Debug, Clone, Default)]
pub struct TreeView {
    pub rows: Vec<Row>,
    visible: Vec<usize>,
    /// Index into the visible rows.
    pub selected_index: usize,
    pub scroll_offset: usize,
    open_depth: usize,
}

impl TreeView {
    /// Render one row per node below `root`, in tree order.
    pub fn new(root: &DirectoryNode, open_depth: usize) -> Self {
        let mut rows = Vec::new();
        Self::push_rows(&root.children, &[], open_depth, &mut rows);
        let mut view = Self {
            rows,
            visible: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            open_depth,
        };
        view.refresh_visibility();
        view
    }

    fn push_rows(
        children: &[TreeNode],
        guides: &[bool],
        open_depth: usize,
        rows: &mut Vec<Row>,
    ) {
        let depth = guides.len();
        for (i, child) in children.iter().enumerate() {
            let entry = match child {
                TreeNode::File(file) => Some(file.entry.clone()),
                TreeNode::Directory(_) => None,
            };
            let is_last_sibling = i + 1 == children.len();
            rows.push(Row {
                name: child.name().to_string(),
                path: child.path().to_string(),
                parent_path: parent_path(child.path()).to_string(),
                node_type: child.node_type(),
                depth,
                collapsed: child.node_type() == NodeType::Directory && depth >= open_depth,
                is_last_sibling,
                guides: guides.to_vec(),
                mark: None,
                entry,
            });
            if let TreeNode::Directory(dir) = child {
                let mut inner = guides.to_vec();
                inner.push(!is_last_sibling);
                Self::push_rows(&dir.children, &inner, open_depth, rows);
            }
        }
    }

    /// Recompute which rows are visible, keeping the selection on the same
    /// row when possible (otherwise on the nearest visible row above it).
    pub fn refresh_visibility(&mut self) {
        let selected_row = self.selected_row();

        self.visible.clear();
        let mut hidden_below: Option<usize> = None;
        for (i, row) in self.rows.iter().enumerate() {
            if let Some(depth) = hidden_below {
                if row.depth > depth {
                    continue;
                }
                hidden_below = None;
            }
            self.visible.push(i);
            if row.is_dir() && row.collapsed {
                hidden_below = Some(row.depth);
            }
        }

        self.selected_index = match selected_row {
            Some(row) => self
                .visible
                .partition_point(|&v| v <= row)
                .saturating_sub(1),
            None => 0,
        };
    }

    /// Row indices currently visible, in display order.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    /// Row index of the selection.
    pub fn selected_row(&self) -> Option<usize> {
        self.visible.get(self.selected_index).copied()
    }

    pub fn selected(&self) -> Option<&Row> {
        self.selected_row().map(|r| &self.rows[r])
    }

    /// Flip a directory between expanded and collapsed. Files are ignored.
    pub fn toggle(&mut self, row: usize) -> bool {
        match self.rows.get_mut(row) {
            Some(r) if r.is_dir() => {
                r.collapsed = !r.collapsed;
                self.refresh_visibility();
                true
            }
            _ => false,
        }
    }

    /// Row indices of the enclosing directories of `row`, nearest first.
    pub fn ancestors(&self, row: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let Some(start) = self.rows.get(row) else {
            return out;
        };
        let mut frontier = start.depth;
        for i in (0..row).rev() {
            if frontier == 0 {
                break;
            }
            if self.rows[i].depth < frontier {
                out.push(i);
                frontier = self.rows[i].depth;
            }
        }
        out
    }

    /// Expand every ancestor of `row` and select it.
    pub fn reveal(&mut self, row: usize) {
        if row >= self.rows.len() {
            return;
        }
        for ancestor in self.ancestors(row) {
            self.rows[ancestor].collapsed = false;
        }
        self.refresh_visibility();
        if let Ok(pos) = self.visible.binary_search(&row) {
            self.selected_index = pos;
        }
    }

    /// Return every directory to its default state and drop highlight marks.
    pub fn reset(&mut self) {
        let open_depth = self.open_depth;
        for row in &mut self.rows {
            row.collapsed = row.is_dir() && row.depth >= open_depth;
            row.mark = None;
        }
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.refresh_visibility();
    }

    /// First row with exactly this path.
    #[cfg(test)]
    pub fn find_path(&self, path: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.path == path)
    }

    /// Next row after `from` (wrapping) carrying `mark`.
    pub fn next_marked(&self, from: Option<usize>, mark: Mark, forward: bool) -> Option<usize> {
        let n = self.rows.len();
        if n == 0 {
            return None;
        }
        let start = from.unwrap_or(if forward { n - 1 } else { 0 });
        (1..=n)
            .map(|step| {
                if forward {
                    (start + step) % n
                } else {
                    (start + n - step % n) % n
                }
            })
            .find(|&i| self.rows[i].mark == Some(mark))
    }

    // ── Selection ───────────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        let len = self.visible.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.visible.len();
        if len > 0 {
            self.selected_index = len - 1;
        }
    }

    /// Select the `n`th visible row, if there is one.
    pub fn select_visible(&mut self, n: usize) -> bool {
        if n < self.visible.len() {
            self.selected_index = n;
            true
        } else {
            false
        }
    }

    /// Collapse the selected directory, or jump to its parent row.
    pub fn collapse_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if self.rows[row].is_dir() && !self.rows[row].collapsed {
            self.toggle(row);
            return;
        }
        if let Some(&parent) = self.ancestors(row).first() {
            if let Ok(pos) = self.visible.binary_search(&parent) {
                self.selected_index = pos;
            }
        }
    }

    /// Expand the selected directory.
    pub fn expand_selected(&mut self) {
        if let Some(row) = self.selected_row() {
            if self.rows[row].is_dir() && self.rows[row].collapsed {
                self.toggle(row);
            }
        }
    }

    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::tree::build_tree;

    impl TreeView {
        fn is_visible(&self, row: usize) -> bool {
            self.visible.binary_search(&row).is_ok()
        }

        fn direct_children(&self, row: usize) -> Vec<usize> {
            let Some(parent) = self.rows.get(row) else {
                return Vec::new();
            };
            self.rows[row + 1..]
                .iter()
                .enumerate()
                .take_while(|(_, r)| r.depth > parent.depth)
                .filter(|(_, r)| r.depth == parent.depth + 1 && r.parent_path == parent.path)
                .map(|(i, _)| row + 1 + i)
                .collect()
        }
    }

    /// a/
    ///   b/
    ///     c/
    ///       deep.html
    ///     x.html
    ///   y.html
    /// z.html
    fn setup_view(open_depth: usize) -> TreeView {
        let root = build_tree(&[
            ManifestEntry::new(1, "a/b/c/deep.html"),
            ManifestEntry::new(2, "a/b/x.html"),
            ManifestEntry::new(3, "a/y.html"),
            ManifestEntry::new(4, "z.html"),
        ]);
        TreeView::new(&root, open_depth)
    }

    fn row(view: &TreeView, path: &str) -> usize {
        view.find_path(path).unwrap()
    }

    fn visible_paths(view: &TreeView) -> Vec<&str> {
        view.visible()
            .iter()
            .map(|&i| view.rows[i].path.as_str())
            .collect()
    }

    #[test]
    fn rows_skip_root_and_record_depth_and_parent() {
        let view = setup_view(usize::MAX);
        assert_eq!(view.rows.len(), 7);
        assert_eq!(view.rows[0].path, "a");
        assert_eq!(view.rows[0].depth, 0);
        assert_eq!(view.rows[0].parent_path, "");
        let deep = &view.rows[row(&view, "a/b/c/deep.html")];
        assert_eq!(deep.depth, 3);
        assert_eq!(deep.parent_path, "a/b/c");
        assert!(deep.entry.is_some());
        assert!(view.rows[row(&view, "z.html")].is_last_sibling);
        assert!(!view.rows[0].is_last_sibling);
    }

    #[test]
    fn guides_follow_ancestor_siblings() {
        let view = setup_view(usize::MAX);
        assert_eq!(view.rows[row(&view, "a/b/c/deep.html")].guides, vec![true, true, true]);
        assert_eq!(view.rows[row(&view, "a/y.html")].guides, vec![true]);
        assert!(view.rows[row(&view, "z.html")].guides.is_empty());

        let lone = TreeView::new(&build_tree(&[ManifestEntry::new(1, "d/e/f.html")]), 0);
        assert_eq!(lone.rows[lone.find_path("d/e/f.html").unwrap()].guides, vec![false, false]);
    }

    #[test]
    fn default_keeps_top_level_open() {
        let view = setup_view(DEFAULT_OPEN_DEPTH);
        assert!(!view.rows[row(&view, "a")].collapsed);
        assert!(view.rows[row(&view, "a/b")].collapsed);
        assert!(view.rows[row(&view, "a/b/c")].collapsed);
        assert_eq!(visible_paths(&view), vec!["a", "a/b", "a/y.html", "z.html"]);
    }

    #[test]
    fn files_never_carry_collapse_state() {
        let view = setup_view(0);
        assert!(view
            .rows
            .iter()
            .filter(|r| !r.is_dir())
            .all(|r| !r.collapsed));
    }

    #[test]
    fn collapsing_hides_direct_children_and_keeps_nested_state() {
        let mut view = setup_view(usize::MAX);
        let a = row(&view, "a");
        let b = row(&view, "a/b");
        let c = row(&view, "a/b/c");

        // Collapse the grandchild first, independently.
        view.toggle(c);
        assert!(!view.is_visible(row(&view, "a/b/c/deep.html")));

        view.toggle(a);
        for child in view.direct_children(a) {
            assert!(!view.is_visible(child));
        }
        assert_eq!(view.direct_children(a), vec![b, row(&view, "a/y.html")]);
        assert!(!view.rows[b].collapsed);
        assert!(view.rows[c].collapsed);

        view.toggle(a);
        for child in view.direct_children(a) {
            assert!(view.is_visible(child));
        }
        assert!(view.is_visible(c));
        assert!(!view.is_visible(row(&view, "a/b/c/deep.html")));
        assert!(view.is_visible(row(&view, "a/b/x.html")));
    }

    #[test]
    fn toggle_on_file_is_ignored() {
        let mut view = setup_view(usize::MAX);
        let before = visible_paths(&view).len();
        assert!(!view.toggle(row(&view, "z.html")));
        assert_eq!(visible_paths(&view).len(), before);
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let view = setup_view(usize::MAX);
        let deep = row(&view, "a/b/c/deep.html");
        let names: Vec<&str> = view
            .ancestors(deep)
            .iter()
            .map(|&i| view.rows[i].path.as_str())
            .collect();
        assert_eq!(names, vec!["a/b/c", "a/b", "a"]);
        assert!(view.ancestors(row(&view, "z.html")).is_empty());
    }

    #[test]
    fn reveal_expands_ancestors_and_selects() {
        let mut view = setup_view(DEFAULT_OPEN_DEPTH);
        let deep = row(&view, "a/b/c/deep.html");
        assert!(!view.is_visible(deep));
        view.reveal(deep);
        assert!(view.is_visible(deep));
        assert_eq!(view.selected_row(), Some(deep));
    }

    #[test]
    fn reset_restores_default_and_clears_marks() {
        let mut view = setup_view(DEFAULT_OPEN_DEPTH);
        let deep = row(&view, "a/b/c/deep.html");
        view.reveal(deep);
        view.rows[deep].mark = Some(Mark::Exact);
        view.toggle(row(&view, "a"));

        view.reset();
        assert_eq!(visible_paths(&view), vec!["a", "a/b", "a/y.html", "z.html"]);
        assert!(view.rows.iter().all(|r| r.mark.is_none()));
        assert_eq!(view.selected_index, 0);
    }

    #[test]
    fn selection_follows_row_across_collapse() {
        let mut view = setup_view(usize::MAX);
        let x = row(&view, "a/b/x.html");
        view.reveal(x);
        assert_eq!(view.selected_row(), Some(x));
        // Collapsing the parent moves selection to the nearest visible row above.
        view.toggle(row(&view, "a/b"));
        assert_eq!(view.selected_row(), Some(row(&view, "a/b")));
    }

    #[test]
    fn collapse_selected_jumps_to_parent_from_file() {
        let mut view = setup_view(usize::MAX);
        view.reveal(row(&view, "a/y.html"));
        view.collapse_selected();
        assert_eq!(view.selected_row(), Some(row(&view, "a")));
        view.collapse_selected();
        assert!(view.rows[row(&view, "a")].collapsed);
        view.expand_selected();
        assert!(!view.rows[row(&view, "a")].collapsed);
    }

    #[test]
    fn select_next_and_previous_clamp() {
        let mut view = setup_view(DEFAULT_OPEN_DEPTH);
        view.select_previous();
        assert_eq!(view.selected_index, 0);
        view.select_last();
        assert_eq!(view.selected_index, 3);
        view.select_next();
        assert_eq!(view.selected_index, 3);
        view.select_first();
        assert_eq!(view.selected_index, 0);
        assert!(!view.select_visible(10));
        assert!(view.select_visible(2));
    }

    #[test]
    fn next_marked_wraps_both_ways() {
        let mut view = setup_view(usize::MAX);
        let x = row(&view, "a/b/x.html");
        let z = row(&view, "z.html");
        view.rows[x].mark = Some(Mark::Exact);
        view.rows[z].mark = Some(Mark::Exact);
        assert_eq!(view.next_marked(None, Mark::Exact, true), Some(x));
        assert_eq!(view.next_marked(Some(x), Mark::Exact, true), Some(z));
        assert_eq!(view.next_marked(Some(z), Mark::Exact, true), Some(x));
        assert_eq!(view.next_marked(Some(x), Mark::Exact, false), Some(z));
        assert_eq!(view.next_marked(Some(x), Mark::Ancestor, true), None);
    }

    #[test]
    fn update_scroll_keeps_selection_in_window() {
        let mut view = setup_view(usize::MAX);
        view.select_last();
        view.update_scroll(3);
        assert_eq!(view.scroll_offset, view.selected_index - 2);
        view.select_first();
        view.update_scroll(3);
        assert_eq!(view.scroll_offset, 0);
    }
}
