//! Hierarchical folder/file tree built from the flat listing.

use crate::model::{FileEntry, TreeItem};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

/// A folder in the tree. Files hang off their folder in `files`; subfolders
/// are keyed by name in `children`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileTreeNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub children: BTreeMap<String, FileTreeNode>,
    pub files: Vec<FileEntry>,
}

impl Default for FileTreeNode {
    fn default() -> Self {
        Self::folder("", "")
    }
}

impl FileTreeNode {
    fn folder(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: NodeKind::Folder,
            children: BTreeMap::new(),
            files: Vec::new(),
        }
    }

    /// Number of files in this subtree.
    pub fn leaf_count(&self) -> usize {
        self.files.len() + self.children.values().map(|c| c.leaf_count()).sum::<usize>()
    }

    /// Look up a folder by its slash-separated path relative to this node.
    pub fn find(&self, path: &str) -> Option<&FileTreeNode> {
        path.split('/')
            .filter(|p| !p.is_empty())
            .try_fold(self, |node, part| node.children.get(part))
    }

    pub fn contains_file(&self, path: &str) -> bool {
        let (dir, _) = path.rsplit_once('/').unwrap_or(("", path));
        self.find(dir)
            .is_some_and(|node| node.files.iter().any(|f| f.path == path))
    }

    /// Depth-first walk. The callback receives each folder and its depth
    /// (the root is depth 0).
    pub fn walk<F: FnMut(&FileTreeNode, usize)>(&self, mut visit: F) {
        fn go<F: FnMut(&FileTreeNode, usize)>(node: &FileTreeNode, depth: usize, visit: &mut F) {
            visit(node, depth);
            for child in node.children.values() {
                go(child, depth + 1, visit);
            }
        }
        go(self, 0, &mut visit);
    }
}

/// Build the folder hierarchy. Intermediate folders are created on demand, a
/// terminal segment becomes a file only for blobs, and empty segments are
/// ignored.
pub fn build_file_tree(items: &[TreeItem]) -> FileTreeNode {
    let mut root = FileTreeNode::default();

    for item in items.iter().filter(|i| !i.path.is_empty()) {
        let parts: Vec<&str> = item.path.split('/').collect();
        let last = parts.len() - 1;
        let mut current = &mut root;

        for (index, part) in parts.iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            if index == last && item.is_blob() {
                current.files.push(FileEntry::from(item));
            } else {
                let path = parts[..=index].join("/");
                current = current
                    .children
                    .entry(part.to_string())
                    .or_insert_with(|| FileTreeNode::folder(part, &path));
            }
        }
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<TreeItem> {
        vec![
            TreeItem::tree("src"),
            TreeItem::blob("src/main.rs", 10),
            TreeItem::blob("src/analysis/mod.rs", 20),
            TreeItem::blob("README.md", 5),
            TreeItem::blob("", 1),
            TreeItem::tree("docs/img"),
        ]
    }

    #[test]
    fn test_every_blob_is_a_leaf_at_its_depth() {
        let tree = build_file_tree(&listing());
        assert_eq!(tree.leaf_count(), 3);
        for item in listing().iter().filter(|i| i.is_blob() && !i.path.is_empty()) {
            assert!(tree.contains_file(&item.path), "{} missing", item.path);
        }

        let mut depths = Vec::new();
        tree.walk(|node, depth| {
            for f in &node.files {
                depths.push((f.path.clone(), depth));
            }
        });
        for (path, depth) in depths {
            assert_eq!(depth, path.matches('/').count());
        }
    }

    #[test]
    fn test_parent_folders_created_implicitly() {
        let tree = build_file_tree(&[TreeItem::blob("a/b/c/d.txt", 1)]);
        let b = tree.find("a/b").unwrap();
        assert_eq!(b.path, "a/b");
        assert_eq!(b.kind, NodeKind::Folder);
        assert!(tree.find("a/b/c").unwrap().files[0].path == "a/b/c/d.txt");
    }

    #[test]
    fn test_tree_items_become_empty_folders() {
        let tree = build_file_tree(&listing());
        let img = tree.find("docs/img").unwrap();
        assert!(img.files.is_empty());
        assert_eq!(img.leaf_count(), 0);
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let tree = build_file_tree(&[TreeItem::blob("a//b.txt", 1)]);
        assert_eq!(tree.find("a").unwrap().files.len(), 1);
        assert!(tree.find("a").unwrap().children.is_empty());
    }
}
