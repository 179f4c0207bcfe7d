//! Directory tree built from the flat manifest.

use crate::archive::model::ManifestEntry;

/// Name of the synthetic root. The root is never rendered.
pub const ROOT_NAME: &str = "root";

/// Type of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    File,
    Directory,
}

/// A directory; children keep manifest encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub name: String,
    pub path: String,
    pub children: Vec<TreeNode>,
}

/// A leaf carrying the manifest entry it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub entry: ManifestEntry,
}

/// A node in the archive tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Directory(DirectoryNode),
    File(FileNode),
}

impl DirectoryNode {
    fn new(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            path,
            children: Vec::new(),
        }
    }

    /// The synthetic root.
    pub fn root() -> Self {
        Self::new(ROOT_NAME, String::new())
    }

    /// Find the child directory `name`, creating it at the end if absent.
    fn child_dir_mut(&mut self, name: &str) -> &mut DirectoryNode {
        let idx = match self
            .children
            .iter()
            .position(|c| matches!(c, TreeNode::Directory(d) if d.name == name))
        {
            Some(idx) => idx,
            None => {
                let path = join_path(&self.path, name);
                self.children
                    .push(TreeNode::Directory(DirectoryNode::new(name, path)));
                self.children.len() - 1
            }
        };
        match &mut self.children[idx] {
            TreeNode::Directory(dir) => dir,
            TreeNode::File(_) => unreachable!("position() only matches directories"),
        }
    }

    /// Visit every descendant depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        Self::walk_children(&self.children, 0, visit);
    }

    fn walk_children<'a>(
        children: &'a [TreeNode],
        depth: usize,
        visit: &mut impl FnMut(&'a TreeNode, usize),
    ) {
        for child in children {
            visit(child, depth);
            if let TreeNode::Directory(dir) = child {
                Self::walk_children(&dir.children, depth + 1, visit);
            }
        }
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Directory(d) => &d.name,
            TreeNode::File(f) => &f.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            TreeNode::Directory(d) => &d.path,
            TreeNode::File(f) => &f.path,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            TreeNode::Directory(_) => NodeType::Directory,
            TreeNode::File(_) => NodeType::File,
        }
    }

    #[cfg(test)]
    pub fn parent_path(&self) -> &str {
        parent_path(self.path())
    }

    #[cfg(test)]
    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Directory(d) => &d.children,
            TreeNode::File(_) => &[],
        }
    }
}

/// `path` with its last segment removed; `""` for top-level paths.
pub fn parent_path(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Build the directory tree for `entries`, in manifest order.
///
/// Directories are created once per (parent, name); files are always
/// appended, so duplicate names produce sibling leaves. Entries without an
/// HTML path are skipped.
pub fn build_tree(entries: &[ManifestEntry]) -> DirectoryNode {
    let mut root = DirectoryNode::root();

    for entry in entries {
        let Some(path_html) = entry.path() else {
            continue;
        };
        let parts: Vec<&str> = path_html.split('/').filter(|p| !p.is_empty()).collect();
        let Some((file_name, dirs)) = parts.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for part in dirs {
            current = current.child_dir_mut(part);
        }

        let path = join_path(&current.path, file_name);
        current.children.push(TreeNode::File(FileNode {
            name: file_name.to_string(),
            path,
            entry: entry.clone(),
        }));
    }

    root
}
