//! Library API for gitnav.
//!
//! These functions return proper `Result` types instead of printing and
//! returning exit codes like the CLI commands do.
//!
//! # Example
//!
//! ```no_run
//! use gitnav::{Config, RepoId, analyze_github};
//!
//! # async fn run() -> Result<(), gitnav::GitnavError> {
//! let repo: RepoId = "rust-lang/cargo".parse().map_err(gitnav::GitnavError::InvalidTarget)?;
//! let result = analyze_github(&repo, &Config::default(), None).await?;
//! println!("{} files, health {}", result.stats.total_files, result.stats.health_score);
//! # Ok(())
//! # }
//! ```

use crate::analysis::{self, SearchFilters, SearchHit};
use crate::config::{Config, ConfigError};
use crate::graph::{GraphData, GraphEngine, GraphMetadata, GraphSettings};
use crate::model::{AnalysisResult, RepoId};
use crate::output::{self, ExportKind};
use crate::source::{
    FetchError, GitHubSource, LocalSource, RepoFiles, RepositorySource, fetch_snapshot,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitnavError {
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid repository: {0}")]
    InvalidTarget(String),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fetch and analyze `repo` through any source.
pub async fn analyze_with(
    source: &dyn RepositorySource,
    repo: &RepoId,
) -> Result<AnalysisResult, GitnavError> {
    let snapshot = fetch_snapshot(source, repo).await?;
    Ok(analysis::analyze(repo, snapshot, &RepoFiles::new(source, repo)).await)
}

/// GitHub client configured from `config`. An explicit `token` wins over the
/// configured environment variable.
pub fn github_source(config: &Config, token: Option<String>) -> Result<GitHubSource, GitnavError> {
    let token = token.or_else(|| config.token_from_env());
    let source = GitHubSource::new(&config.github.api_url, token)?
        .with_commit_details(config.github.commit_details);
    Ok(source)
}

pub async fn analyze_github(
    repo: &RepoId,
    config: &Config,
    token: Option<String>,
) -> Result<AnalysisResult, GitnavError> {
    let source = github_source(config, token)?;
    analyze_with(&source, repo).await
}

/// Analyze a checkout on disk. The repository is named `local/<dir>`.
pub async fn analyze_local(path: &Path) -> Result<AnalysisResult, GitnavError> {
    let root = path
        .canonicalize()
        .map_err(|_| GitnavError::PathNotFound(path.to_path_buf()))?;
    let source = LocalSource::new(root);
    let repo = source.repo_id();
    analyze_with(&source, &repo).await
}

/// Ranked file search over an analysis.
pub fn search(result: &AnalysisResult, query: &str, filters: &SearchFilters) -> Vec<SearchHit> {
    analysis::search_files(&result.files, query, filters)
}

/// Run the graph simulation headless for `steps` frames and return the
/// final layout.
pub fn simulate_layout(
    result: &AnalysisResult,
    settings: GraphSettings,
    steps: u64,
    seed: Option<u64>,
) -> GraphData {
    let mut engine = GraphEngine::new(
        result.repo.clone(),
        result.branch.clone(),
        result.files.clone(),
        settings,
    );
    if let Some(seed) = seed {
        engine = engine.with_seed(seed);
    }
    engine.start();
    engine.run(steps);
    let data = engine.snapshot();
    engine.stop();
    data.unwrap_or_else(|| GraphData {
        nodes: Vec::new(),
        links: Vec::new(),
        metadata: GraphMetadata {
            width: settings.width,
            height: settings.height,
            total_files: 0,
            total_folders: 0,
            steps: 0,
            temperature: 0.0,
            kinetic_energy: 0.0,
        },
    })
}

pub fn export(result: &AnalysisResult, kind: ExportKind) -> Result<String, GitnavError> {
    Ok(output::render(result, kind)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::sample_result;

    #[test]
    fn test_simulate_layout_is_reproducible() {
        let result = sample_result();
        let a = simulate_layout(&result, GraphSettings::default(), 50, Some(5));
        let b = simulate_layout(&result, GraphSettings::default(), 50, Some(5));
        assert_eq!(a.metadata.steps, 50);
        assert_eq!(a.metadata.total_files, 11);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_search_and_export() {
        let result = sample_result();
        let hits = search(&result, "app", &SearchFilters::default());
        assert_eq!(hits[0].file.path, "src/App.jsx");

        let diagram = export(&result, ExportKind::Mermaid).unwrap();
        assert!(diagram.starts_with("graph TD\n"));
    }

    #[tokio::test]
    async fn test_analyze_local_missing_path() {
        let err = analyze_local(Path::new("/no/such/checkout")).await.unwrap_err();
        assert!(matches!(err, GitnavError::PathNotFound(_)));
    }
}
