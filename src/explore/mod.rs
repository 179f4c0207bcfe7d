//! The structure explorer: tokenizer, tree, token index, highlight, and the
//! rendered row state.

pub mod debounce;
pub mod filter;
pub mod highlight;
pub mod index;
pub mod tokenize;
pub mod tree;
pub mod view;

use tracing::debug;

use crate::archive::model::ManifestEntry;
use crate::explore::index::TokenIndex;
use crate::explore::tree::build_tree;
use crate::explore::view::TreeView;

/// Index and rows built together from one manifest's tree.
#[derive(Debug, Clone)]
pub struct Explorer {
    pub index: TokenIndex,
    pub view: TreeView,
}

impl Explorer {
    pub fn build(manifest: &[ManifestEntry], open_depth: usize) -> Self {
        let tree = build_tree(manifest);
        let index = TokenIndex::build(&tree);
        let view = TreeView::new(&tree, open_depth);
        debug!(
            nodes = tree.descendant_count(),
            tokens = index.len(),
            "Built explorer"
        );
        Self { index, view }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::highlight::{apply_highlight, Mark};
    use crate::explore::tokenize::tokenize;
    use crate::explore::view::DEFAULT_OPEN_DEPTH;

    #[test]
    fn two_entry_archive_end_to_end() {
        let manifest = vec![
            ManifestEntry::new(1, "2020/01/a.html"),
            ManifestEntry::new(2, "2020/02/b.html"),
        ];
        let mut explorer = Explorer::build(&manifest, DEFAULT_OPEN_DEPTH);

        let top: Vec<&str> = explorer
            .view
            .rows
            .iter()
            .filter(|r| r.depth == 0)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(top, vec!["2020"]);
        assert_eq!(build_tree(&manifest).children[0].children().len(), 2);
        assert_eq!(explorer.index.lookup("2020").map(|s| s.len()), Some(5));
        assert!(tokenize("2020/01/a.html").contains("a"));

        let summary = apply_highlight("a", &explorer.index, &mut explorer.view.rows);
        assert_eq!(summary.exact, 1);
        let marks: Vec<(&str, Mark)> = explorer
            .view
            .rows
            .iter()
            .filter_map(|r| r.mark.map(|m| (r.path.as_str(), m)))
            .collect();
        assert_eq!(
            marks,
            vec![
                ("2020", Mark::Ancestor),
                ("2020/01", Mark::Ancestor),
                ("2020/01/a.html", Mark::Exact),
            ]
        );
    }

    #[test]
    fn empty_manifest_builds_empty_explorer() {
        let explorer = Explorer::build(&[], DEFAULT_OPEN_DEPTH);
        assert!(explorer.view.rows.is_empty());
        assert!(explorer.index.is_empty());
        assert!(explorer.view.selected().is_none());
    }
}
