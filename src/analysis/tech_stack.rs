use crate::model::FileEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TechCategory {
    Frontend,
    Backend,
    Database,
    Devops,
    Testing,
    Mobile,
}

/// How a rule inspects the lowercased paths.
enum Signal {
    /// Some path equals the needle exactly.
    Path(&'static str),
    /// Some path contains any of the needles. Substrings are also checked
    /// against the space-joined listing, which for plain substrings is the
    /// same test.
    Contains(&'static [&'static str]),
}

impl Signal {
    fn fires(&self, paths: &[String]) -> bool {
        match self {
            Signal::Path(p) => paths.iter().any(|path| path == p),
            Signal::Contains(needles) => paths
                .iter()
                .any(|path| needles.iter().any(|n| path.contains(n))),
        }
    }
}

struct TechRule {
    category: TechCategory,
    name: &'static str,
    signals: &'static [Signal],
}

const fn rule(
    category: TechCategory,
    name: &'static str,
    signals: &'static [Signal],
) -> TechRule {
    TechRule {
        category,
        name,
        signals,
    }
}

use TechCategory::*;

const TECH_RULES: &[TechRule] = &[
    rule(Backend, "Node.js", &[Signal::Path("package.json")]),
    rule(Frontend, "React", &[Signal::Contains(&["react"])]),
    rule(Frontend, "Vue.js", &[Signal::Contains(&["vue"])]),
    rule(Frontend, "Angular", &[Signal::Contains(&["angular"])]),
    rule(Backend, "Express", &[Signal::Contains(&["express"])]),
    rule(Backend, "Django", &[Signal::Contains(&["django"])]),
    rule(Backend, "Flask", &[Signal::Contains(&["flask"])]),
    rule(Mobile, "Flutter", &[Signal::Path("pubspec.yaml")]),
    rule(Backend, "Rust", &[Signal::Path("cargo.toml")]),
    rule(Backend, "Go", &[Signal::Path("go.mod")]),
    rule(Database, "MongoDB", &[Signal::Contains(&["mongodb", "mongoose"])]),
    rule(Database, "PostgreSQL", &[Signal::Contains(&["postgresql", "postgres"])]),
    rule(Database, "MySQL", &[Signal::Contains(&["mysql"])]),
    rule(Database, "Redis", &[Signal::Contains(&["redis"])]),
    rule(
        Devops,
        "Docker",
        &[Signal::Path("dockerfile"), Signal::Contains(&["docker-compose"])],
    ),
    rule(Devops, "GitHub Actions", &[Signal::Contains(&[".github/workflows"])]),
    rule(Devops, "CircleCI", &[Signal::Path(".circleci/config.yml")]),
    rule(Testing, "Jest", &[Signal::Contains(&["jest"])]),
    rule(Testing, "Pytest", &[Signal::Contains(&["pytest"])]),
    rule(Devops, "Webpack", &[Signal::Contains(&["webpack"])]),
    rule(Devops, "Vite", &[Signal::Contains(&["vite"])]),
    rule(Backend, "Java", &[Signal::Contains(&["build.gradle", "pom.xml"])]),
    rule(Backend, "Spring Boot", &[Signal::Contains(&["spring"])]),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Technology {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TechStack {
    pub frontend: Vec<Technology>,
    pub backend: Vec<Technology>,
    pub database: Vec<Technology>,
    pub devops: Vec<Technology>,
    pub testing: Vec<Technology>,
    pub mobile: Vec<Technology>,
}

impl TechStack {
    pub fn get(&self, category: TechCategory) -> &[Technology] {
        match category {
            Frontend => &self.frontend,
            Backend => &self.backend,
            Database => &self.database,
            Devops => &self.devops,
            Testing => &self.testing,
            Mobile => &self.mobile,
        }
    }

    fn push(&mut self, category: TechCategory, name: &str) {
        let list = match category {
            Frontend => &mut self.frontend,
            Backend => &mut self.backend,
            Database => &mut self.database,
            Devops => &mut self.devops,
            Testing => &mut self.testing,
            Mobile => &mut self.mobile,
        };
        if !list.iter().any(|t| t.name == name) {
            list.push(Technology {
                name: name.to_string(),
            });
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        [
            &self.frontend,
            &self.backend,
            &self.database,
            &self.devops,
            &self.testing,
            &self.mobile,
        ]
        .into_iter()
        .flatten()
        .map(|t| t.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.names().next().is_none()
    }
}

/// Infer technologies from path names alone, in rule-table order.
pub fn detect_tech_stack(files: &[FileEntry]) -> TechStack {
    let paths: Vec<String> = files.iter().map(FileEntry::lower_path).collect();
    let mut stack = TechStack::default();

    for rule in TECH_RULES {
        if rule.signals.iter().any(|s| s.fires(&paths)) {
            stack.push(rule.category, rule.name);
        }
    }
    stack
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(paths: &[&str]) -> Vec<FileEntry> {
        paths.iter().map(|p| FileEntry::new(*p, 1)).collect()
    }

    fn names(list: &[Technology]) -> Vec<&str> {
        list.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_node_react_project() {
        let stack = detect_tech_stack(&files(&[
            "package.json",
            "src/components/ReactWidget.jsx",
            "jest.config.js",
            "vite.config.ts",
            ".github/workflows/ci.yml",
            "Dockerfile",
        ]));
        assert_eq!(names(&stack.backend), vec!["Node.js"]);
        assert_eq!(names(&stack.frontend), vec!["React"]);
        assert_eq!(names(&stack.testing), vec!["Jest"]);
        assert_eq!(names(&stack.devops), vec!["Docker", "GitHub Actions", "Vite"]);
    }

    #[test]
    fn test_exact_path_rules_are_root_only() {
        let stack = detect_tech_stack(&files(&["crates/core/Cargo.toml", "go.mod"]));
        assert_eq!(names(&stack.backend), vec!["Go"]);
    }

    #[test]
    fn test_substring_false_positive_preserved() {
        // "revue" contains "vue"
        let stack = detect_tech_stack(&files(&["src/revue/index.md"]));
        assert_eq!(names(&stack.frontend), vec!["Vue.js"]);
    }

    #[test]
    fn test_label_at_most_once() {
        let stack = detect_tech_stack(&files(&["db/postgres.sql", "db/postgresql.conf"]));
        assert_eq!(names(&stack.database), vec!["PostgreSQL"]);
        assert!(detect_tech_stack(&[]).is_empty());
    }
}
