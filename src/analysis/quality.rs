//! Code-quality and documentation-gap scoring.

use super::{code_files, pattern};
use crate::model::{FileEntry, strip_extension};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static TEST_NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\.(test|spec)\."));
static DOC_FILE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\.(md|txt|rst|adoc)$"));
static NOTE_FILE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\.(md|txt|rst)$"));
static DOCUMENTABLE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\.(js|jsx|ts|tsx|py|dart|rs|go|java)$"));

const VERY_LARGE_FILE: u64 = 500_000;
const PUBLIC_FOLDERS: &[&str] = &["src/", "lib/", "app/", "api/"];
const PACKAGE_MANIFESTS: &[&str] = &["package.json", "requirements.txt", "Cargo.toml", "go.mod"];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum QualityBand {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs Work")]
    NeedsWork,
}

impl QualityBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => QualityBand::Excellent,
            60..=79 => QualityBand::Good,
            40..=59 => QualityBand::Fair,
            _ => QualityBand::NeedsWork,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityBand::Excellent => "Excellent",
            QualityBand::Good => "Good",
            QualityBand::Fair => "Fair",
            QualityBand::NeedsWork => "Needs Work",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QualityScores {
    pub maintainability: u8,
    pub testability: u8,
    pub documentation: u8,
    pub structure: u8,
    pub overall: u8,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct QualityIssues {
    pub maintainability: Vec<String>,
    pub testability: Vec<String>,
    pub documentation: Vec<String>,
    pub structure: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CodeQuality {
    pub scores: QualityScores,
    pub issues: QualityIssues,
}

impl Default for CodeQuality {
    fn default() -> Self {
        calculate_code_quality(&[])
    }
}

impl CodeQuality {
    pub fn band(&self) -> QualityBand {
        QualityBand::from_score(self.scores.overall)
    }
}

/// Running score for one dimension. Penalties are recorded with the issue
/// that caused them.
struct Dimension {
    score: i32,
    issues: Vec<String>,
}

impl Dimension {
    fn new() -> Self {
        Self {
            score: 100,
            issues: Vec::new(),
        }
    }

    fn penalize(&mut self, points: i32, issue: impl Into<String>) {
        self.score -= points;
        self.issues.push(issue.into());
    }

    fn score(&self) -> u8 {
        self.score.clamp(0, 100) as u8
    }
}

fn root_file<'a>(files: &'a [FileEntry], lower_name: &str) -> Option<&'a FileEntry> {
    files.iter().find(|f| f.lower_path() == lower_name)
}

fn is_test_file(file: &FileEntry) -> bool {
    file.path.contains("test")
        || file.path.contains("spec")
        || file.path.contains("__tests__")
        || TEST_NAME.is_match(&file.path)
}

/// Score maintainability, testability, documentation and structure, each
/// from 100 down, and average them.
pub fn calculate_code_quality(files: &[FileEntry]) -> CodeQuality {
    let code_count = code_files(files).count();

    let mut maintainability = Dimension::new();
    let large = files.iter().filter(|f| f.size > super::LARGE_FILE_BYTES).count();
    if large > 10 {
        maintainability.penalize(30, "Too many large files (>100KB)");
    } else if large > 5 {
        maintainability.penalize(15, "Several large files detected");
    }
    let very_large = files.iter().filter(|f| f.size > VERY_LARGE_FILE).count();
    if very_large > 0 {
        maintainability.penalize(20, format!("{} file(s) >500KB", very_large));
    }
    if files.iter().filter(|f| f.depth() > 6).count() > 20 {
        maintainability.penalize(15, "Deep folder nesting detected");
    }

    let mut testability = Dimension::new();
    let test_count = files.iter().filter(|f| is_test_file(f)).count();
    let coverage = if code_count > 0 {
        test_count as f64 / code_count as f64 * 100.0
    } else {
        0.0
    };
    if coverage == 0.0 {
        testability.score = 30;
        testability.issues.push("No test files found".into());
    } else if coverage < 10.0 {
        testability.score = 50;
        testability.issues.push("Very low test coverage".into());
    } else if coverage < 20.0 {
        testability.score = 70;
        testability.issues.push("Low test coverage".into());
    } else if coverage < 30.0 {
        testability.score = 85;
    }

    let mut documentation = Dimension::new();
    match root_file(files, "readme.md") {
        None => documentation.penalize(40, "Missing README.md"),
        Some(readme) if readme.size < 500 => documentation.penalize(20, "README is very short"),
        Some(_) => {}
    }
    if root_file(files, "contributing.md").is_none() {
        documentation.penalize(15, "No CONTRIBUTING.md");
    }
    let doc_count = files
        .iter()
        .filter(|f| DOC_FILE.is_match(&f.path) || f.lower_path().contains("doc"))
        .count();
    if doc_count == 0 {
        documentation.penalize(25, "No documentation files");
    } else if doc_count < 3 {
        documentation.penalize(10, "Limited documentation");
    }

    let mut structure = Dimension::new();
    if !files.iter().any(|f| f.path == ".gitignore") {
        structure.penalize(20, "Missing .gitignore");
    }
    if !files.iter().any(|f| f.lower_path().contains("license")) {
        structure.penalize(15, "Missing LICENSE file");
    }
    if !files.iter().any(|f| PACKAGE_MANIFESTS.contains(&f.path.as_str())) {
        structure.penalize(10, "No package manager config");
    }
    let has_src = files
        .iter()
        .any(|f| f.path.starts_with("src/") || f.path.starts_with("lib/"));
    if !has_src && code_count > 10 {
        structure.penalize(15, "No src/ or lib/ folder");
    }

    let dims = [&maintainability, &testability, &documentation, &structure];
    let overall = (dims.iter().map(|d| d.score() as f64).sum::<f64>() / 4.0).round() as u8;

    CodeQuality {
        scores: QualityScores {
            maintainability: maintainability.score(),
            testability: testability.score(),
            documentation: documentation.score(),
            structure: structure.score(),
            overall,
        },
        issues: QualityIssues {
            maintainability: maintainability.issues,
            testability: testability.issues,
            documentation: documentation.issues,
            structure: structure.issues,
        },
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentationGaps {
    pub missing_readme: bool,
    pub short_readme: bool,
    pub no_contributing: bool,
    pub no_changelog: bool,
    pub no_license: bool,
    pub no_api_docs: bool,
    pub undocumented_files: Vec<String>,
    /// Public code files considered for the documented ratio.
    pub total_files: usize,
    pub documented_files: usize,
    pub score: u8,
}

impl Default for DocumentationGaps {
    fn default() -> Self {
        analyze_documentation_gaps(&[])
    }
}

/// A public code file counts as documented when some `.md`, `.txt` or `.rst`
/// file shares its extension-less path as a prefix.
pub fn analyze_documentation_gaps(files: &[FileEntry]) -> DocumentationGaps {
    let mut score: i32 = 100;

    let readme = root_file(files, "readme.md");
    let missing_readme = readme.is_none();
    let short_readme = readme.is_some_and(|r| r.size < 1000);
    if missing_readme {
        score -= 30;
    } else if short_readme {
        score -= 15;
    }

    let no_contributing = root_file(files, "contributing.md").is_none();
    if no_contributing {
        score -= 10;
    }
    let no_changelog = root_file(files, "changelog.md").is_none();
    if no_changelog {
        score -= 10;
    }
    let no_license = !files.iter().any(|f| f.lower_path().contains("license"));
    if no_license {
        score -= 15;
    }

    let code: Vec<&FileEntry> = files
        .iter()
        .filter(|f| {
            DOCUMENTABLE.is_match(&f.path)
                && !f.path.contains("test")
                && !f.path.contains("spec")
                && !f.path.contains("node_modules")
        })
        .collect();

    let has_api_code = code.iter().any(|f| {
        f.path.contains("api") || f.path.contains("controller") || f.path.contains("route")
    });
    let has_api_docs = files.iter().any(|f| {
        f.path.contains("swagger")
            || f.path.contains("openapi")
            || f.lower_path().contains("api.md")
    });
    let no_api_docs = has_api_code && !has_api_docs;
    if no_api_docs {
        score -= 20;
    }

    let public: Vec<&FileEntry> = code
        .into_iter()
        .filter(|f| PUBLIC_FOLDERS.iter().any(|p| f.path.starts_with(p)))
        .collect();

    let mut undocumented_files = Vec::new();
    let mut documented_files = 0;
    for file in &public {
        let base = match file.path.rfind('.') {
            Some(idx) => &file.path[..idx],
            None => file.path.as_str(),
        };
        let documented = files
            .iter()
            .any(|doc| doc.path.starts_with(base) && NOTE_FILE.is_match(&doc.path));
        if documented {
            documented_files += 1;
        } else {
            undocumented_files.push(file.path.clone());
        }
    }

    if !public.is_empty() {
        let ratio = documented_files as f64 / public.len() as f64;
        if ratio < 0.3 {
            score -= 20;
        } else if ratio < 0.6 {
            score -= 10;
        }
    }

    DocumentationGaps {
        missing_readme,
        short_readme,
        no_contributing,
        no_changelog,
        no_license,
        no_api_docs,
        undocumented_files,
        total_files: public.len(),
        documented_files,
        score: score.max(0) as u8,
    }
}

/// Basename with any `.test`/`.spec` infix and the final extension removed.
pub(crate) fn base_name(name: &str) -> String {
    strip_extension(&TEST_NAME.replace(name, ".")).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprawling_repo() -> Vec<FileEntry> {
        (0..1200)
            .map(|i| {
                let size = if i < 12 { 150_000 } else { 2_000 };
                FileEntry::new(format!("a/b/c/d/e/f/file{}.js", i), size)
            })
            .collect()
    }

    #[test]
    fn test_sprawling_repo_needs_work() {
        let quality = calculate_code_quality(&sprawling_repo());
        assert_eq!(
            quality.scores,
            QualityScores {
                maintainability: 55,
                testability: 30,
                documentation: 20,
                structure: 40,
                overall: 36,
            }
        );
        assert_eq!(quality.band(), QualityBand::NeedsWork);
        assert_eq!(quality.issues.structure.len(), 4);
    }

    #[test]
    fn test_empty_repository_is_total() {
        let quality = calculate_code_quality(&[]);
        // no code files means no src/ penalty
        assert_eq!(quality.scores.structure, 55);
        assert_eq!(quality.scores.testability, 30);
        let gaps = analyze_documentation_gaps(&[]);
        assert_eq!(gaps.score, 35);
        assert_eq!(gaps.total_files, 0);
    }

    #[test]
    fn test_well_kept_repository() {
        let mut files = vec![
            FileEntry::new("README.md", 2_000),
            FileEntry::new("CONTRIBUTING.md", 300),
            FileEntry::new("CHANGELOG.md", 300),
            FileEntry::new("LICENSE", 1_000),
            FileEntry::new(".gitignore", 10),
            FileEntry::new("Cargo.toml", 100),
            FileEntry::new("src/lib.rs", 1_000),
            FileEntry::new("src/lib.md", 100),
        ];
        files.push(FileEntry::new("tests/lib_test.rs", 100));

        let quality = calculate_code_quality(&files);
        assert_eq!(quality.scores.maintainability, 100);
        // one test file against two code files
        assert_eq!(quality.scores.testability, 100);
        assert_eq!(quality.scores.documentation, 100);
        assert_eq!(quality.scores.structure, 100);
        assert_eq!(quality.band(), QualityBand::Excellent);

        let gaps = analyze_documentation_gaps(&files);
        assert_eq!(gaps.documented_files, 1);
        assert_eq!(gaps.score, 100);
    }

    #[test]
    fn test_api_docs_gap() {
        let files = vec![
            FileEntry::new("src/api/users.ts", 100),
            FileEntry::new("src/api/users.md", 100),
        ];
        let gaps = analyze_documentation_gaps(&files);
        assert!(gaps.no_api_docs);
        assert_eq!(gaps.documented_files, 1);
        // 100 - 30 - 10 - 10 - 15 - 20
        assert_eq!(gaps.score, 15);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("app.test.js"), "app");
        assert_eq!(base_name("util.spec.ts"), "util");
        assert_eq!(base_name("main.rs"), "main");
    }
}
