mod classify;
mod dependencies;
mod history;
mod metrics;
mod onboarding;
mod performance;
mod quality;
mod search;
mod security;
mod tech_stack;
mod tree;

pub use classify::{
    Category, CategorizedFiles, KeyFile, KeyFileRole, categorize, categorize_files,
    categorize_path, find_key_files, key_file_role,
};
pub use dependencies::{
    Dependency, DependencyMap, Ecosystem, ManifestError, ManifestKind, extract_dependencies,
    is_version_outdated, parse_manifest,
};
pub use history::{
    CoChange, DeletedFile, GrowthPoint, Hotspot, Relation, RelationKind, TimeUnit,
    analyze_file_hotspots, analyze_file_relationships, analyze_repository_growth,
    detect_deleted_files, find_related_files_by_structure,
};
pub use metrics::{
    CodeMetrics, ComplexityBand, ExtensionCount, HealthBand, LARGE_FILE_BYTES, RepoStats,
    calculate_code_metrics, calculate_complexity_score, calculate_health_score, calculate_stats,
    health_tips,
};
pub use onboarding::{OnboardingStep, generate_onboarding_steps};
pub use performance::{
    BundleFile, BundleSize, HeavyDependency, PerformanceMetrics, alternative_for,
    calculate_performance_metrics,
};
pub use quality::{
    CodeQuality, DocumentationGaps, QualityBand, QualityIssues, QualityScores,
    analyze_documentation_gaps, calculate_code_quality,
};
pub use search::{
    DEFAULT_MAX_RESULTS, SearchFilters, SearchHit, SizeBand, fuzzy_match, is_rejected_query,
    search_files,
};
pub use security::{
    ChecklistItem, SECRET_PATTERNS, SecretPattern, analyze_security_issues,
    analyze_vulnerabilities, check_insecure_practices, detect_secret_patterns, security_checklist,
};
pub use tech_stack::{TechCategory, TechStack, Technology, detect_tech_stack};
pub use tree::{FileTreeNode, NodeKind, build_file_tree};

use crate::model::{AnalysisResult, FileEntry, RepoId, RepositorySnapshot, split_tree};
use crate::source::ContentFetcher;
use regex::Regex;
use std::sync::LazyLock;

static CODE_FILE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\.(js|jsx|ts|tsx|py|dart|rs|go|java|cpp|c)$"));

/// Compile a pattern from one of the static rule tables.
pub(crate) fn pattern(p: &str) -> Regex {
    Regex::new(p).unwrap_or_else(|_| panic!("Invalid Regex: {}", p))
}

/// Source files in the languages the metrics understand.
pub(crate) fn code_files(files: &[FileEntry]) -> impl Iterator<Item = &FileEntry> {
    files.iter().filter(|f| CODE_FILE.is_match(&f.path))
}

/// Run every analysis over a fetched snapshot.
///
/// Only dependency extraction touches the network (through `fetcher`); all
/// other passes are pure functions of the snapshot.
pub async fn analyze(
    repo: &RepoId,
    snapshot: RepositorySnapshot,
    fetcher: &dyn ContentFetcher,
) -> AnalysisResult {
    let files: Vec<FileEntry> = snapshot
        .tree
        .iter()
        .filter(|i| i.is_blob())
        .map(FileEntry::from)
        .collect();
    let dependencies = extract_dependencies(&files, fetcher).await;
    assemble(repo, snapshot, dependencies)
}

/// Build the full result from a snapshot and already-extracted dependencies.
pub fn assemble(
    repo: &RepoId,
    snapshot: RepositorySnapshot,
    dependencies: DependencyMap,
) -> AnalysisResult {
    let RepositorySnapshot {
        info,
        branch,
        tree,
        commits,
        contributors,
    } = snapshot;

    let (files, folders) = split_tree(&tree);
    tracing::info!(
        repo = %repo,
        files = files.len(),
        folders = folders.len(),
        "analyzing repository"
    );

    let key_files = find_key_files(&tree);
    let categorized = categorize_files(&files);
    let file_tree = build_file_tree(&tree);
    let stats = calculate_stats(&files, &folders, &info);
    let onboarding = generate_onboarding_steps(&key_files, &categorized);

    AnalysisResult {
        repo: repo.clone(),
        branch,
        key_files,
        file_tree,
        stats,
        tech_stack: detect_tech_stack(&files),
        metrics: calculate_code_metrics(&files, &commits),
        performance: calculate_performance_metrics(&files, &dependencies),
        security: analyze_security_issues(&files),
        secrets: detect_secret_patterns(&files),
        vulnerabilities: analyze_vulnerabilities(&dependencies),
        practices: check_insecure_practices(&files),
        checklist: security_checklist(&files),
        quality: calculate_code_quality(&files),
        documentation: analyze_documentation_gaps(&files),
        hotspots: analyze_file_hotspots(&commits, &files),
        timeline: analyze_repository_growth(&commits),
        deleted_files: detect_deleted_files(&commits),
        onboarding,
        categorized,
        dependencies,
        info,
        files,
        folders,
        commits,
        contributors,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::model::{RepoInfo, TreeItem};

    /// A small React app with a Node backend, docs and tests.
    pub fn sample_result() -> AnalysisResult {
        let tree = vec![
            TreeItem::tree("src"),
            TreeItem::tree("src/components"),
            TreeItem::tree("server"),
            TreeItem::tree("docs"),
            TreeItem::blob("README.md", 2400),
            TreeItem::blob("package.json", 900),
            TreeItem::blob(".gitignore", 60),
            TreeItem::blob("src/index.js", 1500),
            TreeItem::blob("src/App.jsx", 5200),
            TreeItem::blob("src/components/Header.jsx", 2100),
            TreeItem::blob("src/components/Footer.jsx", 1800),
            TreeItem::blob("server/api.js", 7300),
            TreeItem::blob("server/models.py", 3100),
            TreeItem::blob("src/App.test.js", 900),
            TreeItem::blob("docs/guide.md", 4000),
        ];
        let snapshot = RepositorySnapshot {
            info: RepoInfo {
                name: "demo".into(),
                default_branch: Some("main".into()),
                language: Some("JavaScript".into()),
                stargazers_count: 1520,
                forks_count: 12,
                ..Default::default()
            },
            branch: "main".into(),
            tree,
            ..Default::default()
        };
        let mut dependencies = DependencyMap::default();
        dependencies.npm = vec![
            Dependency::new("react", "^18.2.0"),
            Dependency::new("lodash", "4.17.15"),
        ];
        for dep in dependencies.npm.iter_mut() {
            dep.outdated = is_version_outdated(&dep.version);
        }
        assemble(&RepoId::new("octo", "demo"), snapshot, dependencies)
    }
}
