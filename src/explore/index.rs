use std::collections::{HashMap, HashSet};

use crate::explore::tokenize::tokenize;
use crate::explore::tree::DirectoryNode;

/// Token → node paths whose full path produces that token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenIndex {
    entries: HashMap<String, HashSet<String>>,
}

impl TokenIndex {
    /// Index every node below `root`; the root itself is never indexed.
    pub fn build(root: &DirectoryNode) -> Self {
        let mut entries: HashMap<String, HashSet<String>> = HashMap::new();
        root.walk(&mut |node, _| {
            for token in tokenize(node.path()) {
                entries
                    .entry(token)
                    .or_default()
                    .insert(node.path().to_string());
            }
        });
        Self { entries }
    }

    /// Paths registered under exactly `token`.
    pub fn lookup(&self, token: &str) -> Option<&HashSet<String>> {
        self.entries.get(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
