//! Path-pattern classification of files into categories and key-file roles.

use super::pattern;
use crate::model::{FileEntry, TreeItem, file_name};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Frontend,
    Backend,
    Config,
    Tests,
    Docs,
    Other,
}

impl Category {
    /// Every category in rule-precedence order.
    pub const ALL: [Category; 6] = [
        Category::Frontend,
        Category::Backend,
        Category::Config,
        Category::Tests,
        Category::Docs,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Config => "config",
            Category::Tests => "tests",
            Category::Docs => "docs",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// One row of the classification table. A file matches when any pattern
/// matches its lowercased path.
struct CategoryRule {
    category: Category,
    patterns: Vec<Regex>,
}

static RULES: LazyLock<Vec<CategoryRule>> = LazyLock::new(|| {
    vec![
        CategoryRule {
            category: Category::Frontend,
            patterns: vec![
                pattern(r"/(lib|src|components?|views?|pages?|widgets?|ui)/"),
                pattern(r"\.(dart|jsx?|tsx?|vue|svelte|css|scss|sass|less)$"),
            ],
        },
        CategoryRule {
            category: Category::Backend,
            patterns: vec![
                pattern(r"/(server|api|routes?|controllers?|models?|services?)/"),
                pattern(r"\.(py|java|go|rs|php|rb)$"),
            ],
        },
        CategoryRule {
            category: Category::Config,
            patterns: vec![
                pattern(r"\.(json|ya?ml|toml|lock|config|ini)$"),
                pattern(r"^(package|pubspec|cargo|go\.mod|gemfile|dockerfile|makefile)"),
            ],
        },
        CategoryRule {
            category: Category::Tests,
            patterns: vec![
                pattern(r"/(test|__tests__|spec|e2e)/"),
                pattern(r"\.(test|spec)\."),
                pattern(r"_test\."),
            ],
        },
        CategoryRule {
            category: Category::Docs,
            patterns: vec![
                pattern(r"\.(md|txt|rst|adoc)$"),
                pattern(r"^(readme|contributing|changelog|license|authors)"),
            ],
        },
    ]
});

/// Classify a single file. The first matching rule wins; files no rule
/// matches are `Other`.
pub fn categorize(file: &FileEntry) -> Category {
    categorize_path(&file.path)
}

pub fn categorize_path(path: &str) -> Category {
    let lower = path.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| p.is_match(&lower)))
        .map(|rule| rule.category)
        .unwrap_or(Category::Other)
}

/// Files grouped by category, each group in input order.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CategorizedFiles {
    pub frontend: Vec<FileEntry>,
    pub backend: Vec<FileEntry>,
    pub config: Vec<FileEntry>,
    pub tests: Vec<FileEntry>,
    pub docs: Vec<FileEntry>,
    pub other: Vec<FileEntry>,
}

impl CategorizedFiles {
    pub fn get(&self, category: Category) -> &[FileEntry] {
        match category {
            Category::Frontend => &self.frontend,
            Category::Backend => &self.backend,
            Category::Config => &self.config,
            Category::Tests => &self.tests,
            Category::Docs => &self.docs,
            Category::Other => &self.other,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<FileEntry> {
        match category {
            Category::Frontend => &mut self.frontend,
            Category::Backend => &mut self.backend,
            Category::Config => &mut self.config,
            Category::Tests => &mut self.tests,
            Category::Docs => &mut self.docs,
            Category::Other => &mut self.other,
        }
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    /// `(category, count)` pairs for non-empty groups.
    pub fn counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.get(*c).len()))
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}

pub fn categorize_files(files: &[FileEntry]) -> CategorizedFiles {
    let mut grouped = CategorizedFiles::default();
    for file in files {
        grouped.get_mut(categorize(file)).push(file.clone());
    }
    grouped
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum KeyFileRole {
    #[serde(rename = "Entry Point")]
    EntryPoint,
    #[serde(rename = "Frontend Entry")]
    FrontendEntry,
    #[serde(rename = "Node.js Config")]
    NodeConfig,
    #[serde(rename = "Flutter Config")]
    FlutterConfig,
    #[serde(rename = "Python Config")]
    PythonConfig,
    #[serde(rename = "Rust Config")]
    RustConfig,
    #[serde(rename = "Go Config")]
    GoConfig,
    #[serde(rename = "Maven Config")]
    MavenConfig,
    #[serde(rename = "Gradle Config")]
    GradleConfig,
    #[serde(rename = "Docker Config")]
    DockerConfig,
    #[serde(rename = "Git Config")]
    GitConfig,
    #[serde(rename = "Build Config")]
    BuildConfig,
    License,
}

impl KeyFileRole {
    pub fn label(self) -> &'static str {
        match self {
            KeyFileRole::EntryPoint => "Entry Point",
            KeyFileRole::FrontendEntry => "Frontend Entry",
            KeyFileRole::NodeConfig => "Node.js Config",
            KeyFileRole::FlutterConfig => "Flutter Config",
            KeyFileRole::PythonConfig => "Python Config",
            KeyFileRole::RustConfig => "Rust Config",
            KeyFileRole::GoConfig => "Go Config",
            KeyFileRole::MavenConfig => "Maven Config",
            KeyFileRole::GradleConfig => "Gradle Config",
            KeyFileRole::DockerConfig => "Docker Config",
            KeyFileRole::GitConfig => "Git Config",
            KeyFileRole::BuildConfig => "Build Config",
            KeyFileRole::License => "License",
        }
    }

    /// Package-manager and build manifests.
    pub fn is_config(self) -> bool {
        self.label().ends_with("Config")
    }
}

impl std::fmt::Display for KeyFileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase basename → role.
const KEY_FILES: &[(&str, KeyFileRole)] = &[
    ("package.json", KeyFileRole::NodeConfig),
    ("pubspec.yaml", KeyFileRole::FlutterConfig),
    ("requirements.txt", KeyFileRole::PythonConfig),
    ("cargo.toml", KeyFileRole::RustConfig),
    ("go.mod", KeyFileRole::GoConfig),
    ("pom.xml", KeyFileRole::MavenConfig),
    ("build.gradle", KeyFileRole::GradleConfig),
    ("index.js", KeyFileRole::EntryPoint),
    ("main.py", KeyFileRole::EntryPoint),
    ("app.py", KeyFileRole::EntryPoint),
    ("main.dart", KeyFileRole::EntryPoint),
    ("main.go", KeyFileRole::EntryPoint),
    ("main.rs", KeyFileRole::EntryPoint),
    ("index.html", KeyFileRole::FrontendEntry),
    ("dockerfile", KeyFileRole::DockerConfig),
    (".gitignore", KeyFileRole::GitConfig),
    ("license", KeyFileRole::License),
    ("makefile", KeyFileRole::BuildConfig),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeyFile {
    pub path: String,
    /// Lowercased basename.
    pub name: String,
    pub role: KeyFileRole,
}

pub fn key_file_role(name: &str) -> Option<KeyFileRole> {
    let lower = name.to_lowercase();
    KEY_FILES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, role)| *role)
}

/// Files whose basename is in the key-file table, in listing order.
pub fn find_key_files(items: &[TreeItem]) -> Vec<KeyFile> {
    items
        .iter()
        .filter(|item| item.is_blob())
        .filter_map(|item| {
            let name = file_name(&item.path).to_lowercase();
            key_file_role(&name).map(|role| KeyFile {
                path: item.path.clone(),
                name,
                role,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> FileEntry {
        FileEntry::new(path, 10)
    }

    #[test]
    fn test_rule_precedence() {
        // frontend segment beats backend extension
        assert_eq!(categorize_path("app/src/server.py"), Category::Frontend);
        assert_eq!(categorize_path("src/main.rs"), Category::Backend);
        assert_eq!(categorize_path("web/App.tsx"), Category::Frontend);
        assert_eq!(categorize_path("app/api/handler.txt"), Category::Backend);
        assert_eq!(categorize_path("package.json"), Category::Config);
        assert_eq!(categorize_path("Dockerfile"), Category::Config);
        assert_eq!(categorize_path("Cargo.lock"), Category::Config);
        assert_eq!(categorize_path("pkg/e2e/run.sh"), Category::Tests);
        assert_eq!(categorize_path("pkg/util_test.c"), Category::Tests);
        assert_eq!(categorize_path("docs/guide.md"), Category::Docs);
        assert_eq!(categorize_path("LICENSE"), Category::Docs);
        assert_eq!(categorize_path("assets/logo.png"), Category::Other);
    }

    #[test]
    fn test_test_files_with_code_extension_are_frontend() {
        // extension rules of earlier rows take precedence over test naming
        assert_eq!(categorize_path("app.test.js"), Category::Frontend);
        assert_eq!(categorize_path("tests/test_api.py"), Category::Backend);
    }

    #[test]
    fn test_categorize_is_total_and_idempotent() {
        let files: Vec<FileEntry> = [
            "README.md",
            "src/index.ts",
            "server/app.go",
            "config.yaml",
            "a/spec/x.sh",
            "bin/tool",
            "",
        ]
        .iter()
        .map(|p| file(p))
        .collect();

        let first = categorize_files(&files);
        let second = categorize_files(&files);
        assert_eq!(first, second);
        assert_eq!(first.total(), files.len());
        assert_eq!(first.other.len(), 2);
    }

    #[test]
    fn test_counts_skip_empty_groups() {
        let grouped = categorize_files(&[file("README.md"), file("docs/a.md")]);
        assert_eq!(grouped.counts(), vec![(Category::Docs, 2)]);
    }

    #[test]
    fn test_find_key_files_case_insensitive() {
        let items = vec![
            TreeItem::blob("Cargo.toml", 1),
            TreeItem::blob("src/main.rs", 1),
            TreeItem::blob("LICENSE", 1),
            TreeItem::blob("src/lib.rs", 1),
            TreeItem::tree("Dockerfile"),
        ];
        let keys = find_key_files(&items);
        let roles: Vec<_> = keys.iter().map(|k| (k.name.as_str(), k.role)).collect();
        assert_eq!(
            roles,
            vec![
                ("cargo.toml", KeyFileRole::RustConfig),
                ("main.rs", KeyFileRole::EntryPoint),
                ("license", KeyFileRole::License),
            ]
        );
        assert!(keys[0].role.is_config());
        assert!(!keys[1].role.is_config());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Tests".parse::<Category>().unwrap(), Category::Tests);
        assert!("misc".parse::<Category>().is_err());
    }
}
