use super::{FetchError, RepositorySource};
use crate::fs::{FileSystem, RealFs};
use crate::model::{Commit, Contributor, RepoId, RepoInfo, TreeItem};
use async_trait::async_trait;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A checkout on disk. Every branch name resolves to the working tree, and
/// history is not read.
pub struct LocalSource {
    root: PathBuf,
    fs: Box<dyn FileSystem>,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_fs(root, Box::new(RealFs::new()))
    }

    pub fn with_fs(root: impl Into<PathBuf>, fs: Box<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifier for the checkout: `local/<directory name>`.
    pub fn repo_id(&self) -> RepoId {
        RepoId::new("local", self.dir_name())
    }

    fn dir_name(&self) -> String {
        self.root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone())
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("project")
            .to_string()
    }

    /// Branch checked out in `.git/HEAD`, if any.
    fn head_branch(&self) -> Option<String> {
        let head = self.fs.read_to_string(&self.root.join(".git").join("HEAD")).ok()?;
        head.trim()
            .strip_prefix("ref: refs/heads/")
            .map(|b| b.to_string())
    }

    fn walk(&self) -> Vec<TreeItem> {
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut items = Vec::new();
        for entry in walker.flatten() {
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let path = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect::<Vec<_>>()
                .join("/");
            if path.is_empty() {
                continue;
            }

            match entry.file_type() {
                Some(t) if t.is_dir() => items.push(TreeItem::tree(path)),
                Some(t) if t.is_file() => {
                    let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                    items.push(TreeItem::blob(path, size));
                }
                _ => {}
            }
        }
        items
    }
}

#[async_trait]
impl RepositorySource for LocalSource {
    async fn repo_info(&self, _repo: &RepoId) -> Result<RepoInfo, FetchError> {
        Ok(RepoInfo {
            name: self.dir_name(),
            default_branch: self.head_branch(),
            ..Default::default()
        })
    }

    async fn tree(&self, _repo: &RepoId, _branch: &str) -> Result<Vec<TreeItem>, FetchError> {
        if !self.root.is_dir() {
            return Err(FetchError::Transport(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        let items = self.walk();
        tracing::debug!(root = %self.root.display(), items = items.len(), "walked checkout");
        Ok(items)
    }

    async fn commits(&self, _repo: &RepoId) -> Result<Vec<Commit>, FetchError> {
        Ok(Vec::new())
    }

    async fn contributors(&self, _repo: &RepoId) -> Result<Vec<Contributor>, FetchError> {
        Ok(Vec::new())
    }

    async fn file_text(&self, _repo: &RepoId, path: &str) -> Result<String, FetchError> {
        self.fs
            .read_to_string(&self.root.join(path))
            .map_err(|e| FetchError::Transport(format!("{}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use crate::source::fetch_snapshot;
    use std::fs;

    #[tokio::test]
    async fn test_walks_checkout_including_dotfiles() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/trunk\n").unwrap();
        fs::write(dir.path().join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join(".gitignore"), "target/\n").unwrap();

        let source = LocalSource::new(dir.path());
        let snapshot = fetch_snapshot(&source, &source.repo_id()).await.unwrap();

        assert_eq!(snapshot.info.default_branch.as_deref(), Some("trunk"));
        assert_eq!(snapshot.branch, "trunk");
        let mut paths: Vec<_> = snapshot.tree.iter().map(|i| i.path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, vec![".gitignore", "src", "src/main.rs"]);
        let main = snapshot.tree.iter().find(|i| i.path == "src/main.rs").unwrap();
        assert_eq!(main.size, 12);
    }

    #[tokio::test]
    async fn test_file_text_through_filesystem() {
        let fs = MockFs::with_files([(Path::new("/repo/package.json"), "{}")]);
        let source = LocalSource::with_fs("/repo", Box::new(fs));
        let id = RepoId::new("local", "repo");
        assert_eq!(source.file_text(&id, "package.json").await.unwrap(), "{}");
        assert!(source.file_text(&id, "missing.txt").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_directory_fails_tree() {
        let source = LocalSource::new("/definitely/not/here");
        let id = source.repo_id();
        assert!(source.tree(&id, "main").await.is_err());
    }
}
