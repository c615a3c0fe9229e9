//! Dependency extraction from root-level package manifests.

use super::pattern;
use crate::model::FileEntry;
use crate::source::ContentFetcher;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static PUBSPEC_ENTRY: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\w+):\s*(.+)"));
static CARGO_ENTRY: LazyLock<Regex> = LazyLock::new(|| pattern(r#"(\S+)\s*=\s*"(.+)""#));

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML manifest: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    /// Set for caret or tilde ranges. A naming heuristic, not a registry check.
    pub outdated: bool,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            outdated: false,
        }
    }
}

pub fn is_version_outdated(version: &str) -> bool {
    version.contains('^') || version.contains('~')
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Npm,
    Python,
    Flutter,
    Rust,
    Go,
    Maven,
    Gradle,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 7] = [
        Ecosystem::Npm,
        Ecosystem::Python,
        Ecosystem::Flutter,
        Ecosystem::Rust,
        Ecosystem::Go,
        Ecosystem::Maven,
        Ecosystem::Gradle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Python => "python",
            Ecosystem::Flutter => "flutter",
            Ecosystem::Rust => "rust",
            Ecosystem::Go => "go",
            Ecosystem::Maven => "maven",
            Ecosystem::Gradle => "gradle",
        }
    }
}

/// Dependencies grouped by ecosystem. Go, Maven and Gradle have no parser
/// and stay empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DependencyMap {
    pub npm: Vec<Dependency>,
    pub python: Vec<Dependency>,
    pub flutter: Vec<Dependency>,
    pub rust: Vec<Dependency>,
    pub go: Vec<Dependency>,
    pub maven: Vec<Dependency>,
    pub gradle: Vec<Dependency>,
}

impl DependencyMap {
    pub fn get(&self, ecosystem: Ecosystem) -> &[Dependency] {
        match ecosystem {
            Ecosystem::Npm => &self.npm,
            Ecosystem::Python => &self.python,
            Ecosystem::Flutter => &self.flutter,
            Ecosystem::Rust => &self.rust,
            Ecosystem::Go => &self.go,
            Ecosystem::Maven => &self.maven,
            Ecosystem::Gradle => &self.gradle,
        }
    }

    fn set(&mut self, ecosystem: Ecosystem, deps: Vec<Dependency>) {
        match ecosystem {
            Ecosystem::Npm => self.npm = deps,
            Ecosystem::Python => self.python = deps,
            Ecosystem::Flutter => self.flutter = deps,
            Ecosystem::Rust => self.rust = deps,
            Ecosystem::Go => self.go = deps,
            Ecosystem::Maven => self.maven = deps,
            Ecosystem::Gradle => self.gradle = deps,
        }
    }

    /// npm, python, flutter and rust dependencies in that order; the set the
    /// vulnerability and bundle heuristics look at.
    pub fn scanned(&self) -> impl Iterator<Item = &Dependency> {
        self.npm
            .iter()
            .chain(&self.python)
            .chain(&self.flutter)
            .chain(&self.rust)
    }

    pub fn total(&self) -> usize {
        Ecosystem::ALL.iter().map(|e| self.get(*e).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    PackageJson,
    Requirements,
    Pubspec,
    Cargo,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 4] = [
        ManifestKind::PackageJson,
        ManifestKind::Requirements,
        ManifestKind::Pubspec,
        ManifestKind::Cargo,
    ];

    /// Root-relative path the manifest must have.
    pub fn path(self) -> &'static str {
        match self {
            ManifestKind::PackageJson => "package.json",
            ManifestKind::Requirements => "requirements.txt",
            ManifestKind::Pubspec => "pubspec.yaml",
            ManifestKind::Cargo => "Cargo.toml",
        }
    }

    pub fn ecosystem(self) -> Ecosystem {
        match self {
            ManifestKind::PackageJson => Ecosystem::Npm,
            ManifestKind::Requirements => Ecosystem::Python,
            ManifestKind::Pubspec => Ecosystem::Flutter,
            ManifestKind::Cargo => Ecosystem::Rust,
        }
    }
}

/// Parse manifest text into dependency records.
pub fn parse_manifest(kind: ManifestKind, text: &str) -> Result<Vec<Dependency>, ManifestError> {
    match kind {
        ManifestKind::PackageJson => parse_package_json(text),
        ManifestKind::Requirements => Ok(parse_requirements(text)),
        ManifestKind::Pubspec => Ok(parse_pubspec(text)),
        ManifestKind::Cargo => parse_cargo_toml(text),
    }
}

fn parse_package_json(text: &str) -> Result<Vec<Dependency>, ManifestError> {
    let pkg: serde_json::Value = serde_json::from_str(text)?;
    let Some(deps) = pkg.get("dependencies").and_then(|d| d.as_object()) else {
        return Ok(Vec::new());
    };

    Ok(deps
        .iter()
        .map(|(name, version)| {
            let version = match version.as_str() {
                Some(v) => v.to_string(),
                None => version.to_string(),
            };
            Dependency {
                outdated: is_version_outdated(&version),
                name: name.clone(),
                version,
            }
        })
        .collect())
}

fn parse_requirements(text: &str) -> Vec<Dependency> {
    text.lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| {
            let mut parts = line.split("==");
            let name = parts.next().unwrap_or_default().trim();
            let version = parts
                .next()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or("latest");
            Dependency::new(name, version)
        })
        .collect()
}

fn parse_pubspec(text: &str) -> Vec<Dependency> {
    let mut deps = Vec::new();
    let mut in_deps = false;

    for line in text.lines() {
        match line.trim() {
            "dependencies:" => in_deps = true,
            "dev_dependencies:" => in_deps = false,
            _ if in_deps && line.contains(':') => {
                if let Some(caps) = PUBSPEC_ENTRY.captures(line) {
                    deps.push(Dependency::new(&caps[1], caps[2].trim()));
                }
            }
            _ => {}
        }
    }
    deps
}

/// Line-based scan of the `[dependencies]` table. The text must still be
/// valid TOML.
fn parse_cargo_toml(text: &str) -> Result<Vec<Dependency>, ManifestError> {
    let _: toml::Table = toml::from_str(text)?;

    let mut deps = Vec::new();
    let mut in_deps = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed == "[dependencies]" {
            in_deps = true;
        } else if trimmed.starts_with('[') {
            in_deps = false;
        } else if in_deps && line.contains('=') {
            if let Some(caps) = CARGO_ENTRY.captures(line) {
                deps.push(Dependency::new(&caps[1], &caps[2]));
            }
        }
    }
    Ok(deps)
}

/// Fetch and parse every root-level manifest present in `files`.
///
/// A manifest that cannot be fetched or parsed leaves its ecosystem empty.
pub async fn extract_dependencies(
    files: &[FileEntry],
    fetcher: &dyn ContentFetcher,
) -> DependencyMap {
    let mut deps = DependencyMap::default();

    for kind in ManifestKind::ALL {
        if !files.iter().any(|f| f.path == kind.path()) {
            continue;
        }

        let text = match fetcher.fetch_text(kind.path()).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(manifest = kind.path(), error = %e, "manifest fetch failed");
                continue;
            }
        };

        match parse_manifest(kind, &text) {
            Ok(parsed) => {
                tracing::debug!(manifest = kind.path(), count = parsed.len(), "parsed manifest");
                deps.set(kind.ecosystem(), parsed);
            }
            Err(e) => {
                tracing::debug!(manifest = kind.path(), error = %e, "manifest parse failed");
            }
        }
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[test]
    fn test_package_json_caret_is_outdated() {
        let deps = parse_manifest(
            ManifestKind::PackageJson,
            r#"{"dependencies":{"left-pad":"^1.3.0"}}"#,
        )
        .unwrap();
        assert_eq!(
            deps,
            vec![Dependency {
                name: "left-pad".into(),
                version: "^1.3.0".into(),
                outdated: true,
            }]
        );
    }

    #[test]
    fn test_package_json_without_dependencies() {
        let deps = parse_manifest(ManifestKind::PackageJson, r#"{"name":"x"}"#).unwrap();
        assert!(deps.is_empty());
        assert!(parse_manifest(ManifestKind::PackageJson, "{not json").is_err());
    }

    #[test]
    fn test_requirements() {
        let text = "# pinned\nrequests==2.31.0\n\nflask\n  \n";
        let deps = parse_manifest(ManifestKind::Requirements, text).unwrap();
        assert_eq!(
            deps,
            vec![
                Dependency::new("requests", "2.31.0"),
                Dependency::new("flask", "latest"),
            ]
        );
    }

    #[test]
    fn test_pubspec_stops_at_dev_dependencies() {
        let text = "name: app\ndependencies:\n  http: ^0.13.0\n  provider: 6.0.0\ndev_dependencies:\n  test: any\n";
        let deps = parse_manifest(ManifestKind::Pubspec, text).unwrap();
        let names: Vec<_> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["http", "provider"]);
        // only npm versions carry the outdated flag
        assert!(!deps[0].outdated);
    }

    #[test]
    fn test_cargo_dependencies_table_only() {
        let text = r#"
[package]
name = "demo"
version = "0.1.0"

[dependencies]
serde = "1.0"
regex = "1"

[dev-dependencies]
tempfile = "3"
"#;
        let deps = parse_manifest(ManifestKind::Cargo, text).unwrap();
        assert_eq!(
            deps,
            vec![Dependency::new("serde", "1.0"), Dependency::new("regex", "1")]
        );
        assert!(parse_manifest(ManifestKind::Cargo, "[dependencies\nx = ").is_err());
    }

    struct MapFetcher(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl ContentFetcher for MapFetcher {
        async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
            self.0
                .get(path)
                .map(|s| s.to_string())
                .ok_or(FetchError::Http { status: 404 })
        }
    }

    #[tokio::test]
    async fn test_extract_swallows_failures() {
        let files = vec![
            FileEntry::new("package.json", 10),
            FileEntry::new("requirements.txt", 10),
            FileEntry::new("Cargo.toml", 10),
            FileEntry::new("web/pubspec.yaml", 10),
        ];
        let fetcher = MapFetcher(HashMap::from([
            ("package.json", r#"{"dependencies":{"axios":"0.21.0"}}"#),
            ("Cargo.toml", "not = [valid"),
            ("web/pubspec.yaml", "dependencies:\n  http: 1.0.0\n"),
        ]));

        let deps = extract_dependencies(&files, &fetcher).await;
        assert_eq!(deps.npm, vec![Dependency::new("axios", "0.21.0")]);
        // requirements.txt fetch failed, Cargo.toml failed to parse
        assert!(deps.python.is_empty());
        assert!(deps.rust.is_empty());
        // nested manifests are not root-level
        assert!(deps.flutter.is_empty());
        assert_eq!(deps.total(), 1);
    }
}
