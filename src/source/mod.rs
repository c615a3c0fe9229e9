//! Repository data sources.
//!
//! A [`RepositorySource`] supplies the raw inputs of an analysis: metadata,
//! the recursive tree listing, recent commits, contributors and the text of
//! individual files. [`fetch_snapshot`] composes those calls with the
//! required/optional semantics the analysis expects.

mod github;
mod local;

pub use github::{GITHUB_API, GitHubSource};
pub use local::LocalSource;

use crate::model::{Commit, Contributor, RepoId, RepoInfo, RepositorySnapshot, TreeItem};
use async_trait::async_trait;
use thiserror::Error;

pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub API rate limit exceeded. {reset_minutes} minutes remaining.")]
    RateLimited { reset_minutes: i64 },

    #[error(
        "Repository {owner}/{repo} not found or is private. Add a GitHub token if this is a private repository."
    )]
    NotFound { owner: String, repo: String },

    #[error("Invalid GitHub token. Please check your token.")]
    InvalidCredentials,

    #[error("Could not fetch repository tree. Tried branches: {}", .tried.join(", "))]
    BranchResolution { tried: [String; 2] },

    #[error("Request failed (Status: {status})")]
    Http { status: u16 },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Suggested next steps for the user.
    pub fn remediation(&self) -> &'static [&'static str] {
        match self {
            FetchError::RateLimited { .. } => &[
                "Wait for the limit window to reset",
                "Set GITHUB_TOKEN to raise the hourly limit",
            ],
            FetchError::NotFound { .. } => &[
                "Check the owner and repository name",
                "Set GITHUB_TOKEN if the repository is private",
            ],
            FetchError::InvalidCredentials => &[
                "Generate a new personal access token",
                "Unset GITHUB_TOKEN to use anonymous access",
            ],
            FetchError::BranchResolution { .. } => &[
                "Verify the repository's default branch exists",
                "The repository may be empty",
            ],
            FetchError::Http { .. } => &["Retry later; the host returned an unexpected status"],
            FetchError::Transport(_) => &["Check your network connection or proxy settings"],
            FetchError::Decode(_) => &["The host returned data in an unexpected format"],
        }
    }

    /// Map a failed response status to an error.
    pub fn from_status(status: u16, repo: &RepoId, reset_minutes: Option<i64>) -> Self {
        match status {
            401 => FetchError::InvalidCredentials,
            403 => FetchError::RateLimited {
                reset_minutes: reset_minutes.unwrap_or(0),
            },
            404 => FetchError::NotFound {
                owner: repo.owner.clone(),
                repo: repo.repo.clone(),
            },
            _ => FetchError::Http { status },
        }
    }
}

/// Supplies raw text of files by repository-relative path.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
}

#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn repo_info(&self, repo: &RepoId) -> Result<RepoInfo, FetchError>;

    /// Recursive listing of `branch`.
    async fn tree(&self, repo: &RepoId, branch: &str) -> Result<Vec<TreeItem>, FetchError>;

    async fn commits(&self, repo: &RepoId) -> Result<Vec<Commit>, FetchError>;

    async fn contributors(&self, repo: &RepoId) -> Result<Vec<Contributor>, FetchError>;

    async fn file_text(&self, repo: &RepoId, path: &str) -> Result<String, FetchError>;
}

/// A source bound to one repository, usable wherever file text is needed.
pub struct RepoFiles<'a> {
    source: &'a dyn RepositorySource,
    repo: &'a RepoId,
}

impl<'a> RepoFiles<'a> {
    pub fn new(source: &'a dyn RepositorySource, repo: &'a RepoId) -> Self {
        Self { source, repo }
    }
}

#[async_trait]
impl ContentFetcher for RepoFiles<'_> {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.source.file_text(self.repo, path).await
    }
}

/// `main` and `master` stand in for each other.
pub fn alternate_branch(branch: &str) -> &'static str {
    if branch == "main" { "master" } else { "main" }
}

/// Fetch everything an analysis needs.
///
/// Metadata and the tree are required and fetched in order; a tree that
/// fails on the default branch is retried once on the alternate branch.
/// Commits and contributors are fetched concurrently and fall back to empty
/// lists.
pub async fn fetch_snapshot(
    source: &dyn RepositorySource,
    repo: &RepoId,
) -> Result<RepositorySnapshot, FetchError> {
    let info = source.repo_info(repo).await?;
    let default_branch = info
        .default_branch
        .clone()
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

    let (branch, tree) = match source.tree(repo, &default_branch).await {
        Ok(tree) => (default_branch, tree),
        Err(e) => {
            let alt = alternate_branch(&default_branch);
            tracing::debug!(branch = %default_branch, error = %e, "tree fetch failed, trying {}", alt);
            match source.tree(repo, alt).await {
                Ok(tree) => (alt.to_string(), tree),
                Err(_) => {
                    return Err(FetchError::BranchResolution {
                        tried: [default_branch, alt.to_string()],
                    });
                }
            }
        }
    };

    let (commits, contributors) = tokio::join!(source.commits(repo), source.contributors(repo));
    let commits = commits.unwrap_or_else(|e| {
        tracing::warn!(repo = %repo, error = %e, "commit history unavailable");
        Vec::new()
    });
    let contributors = contributors.unwrap_or_else(|e| {
        tracing::warn!(repo = %repo, error = %e, "contributors unavailable");
        Vec::new()
    });

    tracing::info!(
        repo = %repo,
        branch = %branch,
        items = tree.len(),
        commits = commits.len(),
        "fetched repository"
    );

    Ok(RepositorySnapshot {
        info,
        branch,
        tree,
        commits,
        contributors,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned source that records which branches were requested.
    #[derive(Default)]
    pub struct StubSource {
        pub info: RepoInfo,
        pub trees: HashMap<String, Vec<TreeItem>>,
        pub commits: Option<Vec<Commit>>,
        pub files: HashMap<String, String>,
        pub info_error: Option<u16>,
        pub requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RepositorySource for StubSource {
        async fn repo_info(&self, repo: &RepoId) -> Result<RepoInfo, FetchError> {
            match self.info_error {
                Some(status) => Err(FetchError::from_status(status, repo, Some(12))),
                None => Ok(self.info.clone()),
            }
        }

        async fn tree(&self, _repo: &RepoId, branch: &str) -> Result<Vec<TreeItem>, FetchError> {
            if let Ok(mut requested) = self.requested.lock() {
                requested.push(branch.to_string());
            }
            self.trees
                .get(branch)
                .cloned()
                .ok_or(FetchError::Http { status: 404 })
        }

        async fn commits(&self, _repo: &RepoId) -> Result<Vec<Commit>, FetchError> {
            self.commits
                .clone()
                .ok_or_else(|| FetchError::Transport("connection reset".into()))
        }

        async fn contributors(&self, _repo: &RepoId) -> Result<Vec<Contributor>, FetchError> {
            Ok(Vec::new())
        }

        async fn file_text(&self, _repo: &RepoId, path: &str) -> Result<String, FetchError> {
            self.files
                .get(path)
                .cloned()
                .ok_or(FetchError::Http { status: 404 })
        }
    }
}
