use serde::{Deserialize, Serialize};

/// Kind of an entry in a recursive tree listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Blob,
    Tree,
    /// Submodule references and anything else the host reports.
    #[serde(other)]
    Other,
}

/// One entry of the flat tree listing, exactly as the host reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeItem {
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default)]
    pub size: u64,
}

impl TreeItem {
    pub fn blob(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: ItemKind::Blob,
            size,
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ItemKind::Tree,
            size: 0,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == ItemKind::Blob
    }

    pub fn is_tree(&self) -> bool {
        self.kind == ItemKind::Tree
    }
}

/// A file (blob) in the repository snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FileEntry {
    pub path: String,
    #[serde(default)]
    pub size: u64,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        file_name(&self.path)
    }

    /// Lowercased extension without the dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        extension(&self.path)
    }

    /// Number of `/`-separated segments in the path.
    pub fn depth(&self) -> usize {
        self.path.split('/').count()
    }

    pub fn lower_path(&self) -> String {
        self.path.to_lowercase()
    }
}

impl From<&TreeItem> for FileEntry {
    fn from(item: &TreeItem) -> Self {
        Self {
            path: item.path.clone(),
            size: item.size,
        }
    }
}

/// Split a tree listing into its files and folders.
pub fn split_tree(items: &[TreeItem]) -> (Vec<FileEntry>, Vec<String>) {
    let files = items
        .iter()
        .filter(|i| i.is_blob())
        .map(FileEntry::from)
        .collect();
    let folders = items
        .iter()
        .filter(|i| i.is_tree())
        .map(|i| i.path.clone())
        .collect();
    (files, folders)
}

pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Parent directory of a path, empty for root-level entries.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

pub fn extension(path: &str) -> Option<String> {
    let name = file_name(path);
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => Some(name[idx + 1..].to_lowercase()),
        _ => None,
    }
}

/// Name with its final extension removed (`app.test.js` → `app.test`).
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}
