mod commit;
mod file;
mod issue;
mod repository;

pub use commit::{Commit, CommitAuthor, CommitDetail, CommitFile};
pub use file::{
    FileEntry, ItemKind, TreeItem, extension, file_name, parent_dir, split_tree, strip_extension,
};
pub use issue::{PracticeIssue, SecretFinding, SecurityIssue, Severity, Vulnerability};
pub use repository::{Contributor, RepoId, RepoInfo};

use crate::analysis::{
    CategorizedFiles, ChecklistItem, CodeMetrics, CodeQuality, DeletedFile, DependencyMap, DocumentationGaps,
    FileTreeNode, GrowthPoint, Hotspot, KeyFile, OnboardingStep, PerformanceMetrics, RepoStats,
    TechStack,
};
use serde::{Deserialize, Serialize};

/// Raw data fetched for one repository, before any analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    #[serde(default)]
    pub info: RepoInfo,
    /// Branch whose tree was listed.
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub tree: Vec<TreeItem>,
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub contributors: Vec<Contributor>,
}

/// Everything the renderer needs for one repository.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub repo: RepoId,
    pub branch: String,
    pub info: RepoInfo,
    pub files: Vec<FileEntry>,
    pub folders: Vec<String>,
    pub commits: Vec<Commit>,
    pub contributors: Vec<Contributor>,
    pub key_files: Vec<KeyFile>,
    pub categorized: CategorizedFiles,
    pub file_tree: FileTreeNode,
    pub stats: RepoStats,
    pub dependencies: DependencyMap,
    pub tech_stack: TechStack,
    pub metrics: CodeMetrics,
    pub performance: PerformanceMetrics,
    pub security: Vec<SecurityIssue>,
    pub secrets: Vec<SecretFinding>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub practices: Vec<PracticeIssue>,
    pub checklist: Vec<ChecklistItem>,
    pub quality: CodeQuality,
    pub documentation: DocumentationGaps,
    pub hotspots: Vec<Hotspot>,
    pub timeline: Vec<GrowthPoint>,
    pub deleted_files: Vec<DeletedFile>,
    pub onboarding: Vec<OnboardingStep>,
}
