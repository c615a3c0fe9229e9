//! Filename-driven security heuristics.
//!
//! Nothing here reads file contents. The findings are hints derived from
//! path names and declared dependencies, and false positives are expected.

use super::dependencies::DependencyMap;
use super::pattern;
use crate::model::{FileEntry, PracticeIssue, SecretFinding, SecurityIssue, Severity, Vulnerability};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

const SECRET_FINDING_CAP: usize = 15;
const SECRET_LINE: &str = "Multiple locations";

const LOCK_FILES: &[&str] = &["package-lock.json", "yarn.lock", "Cargo.lock", "Pipfile.lock"];
const SENSITIVE_NAMES: &[&str] = &["password", "secret", "api_key", "credentials"];
const SUSPICIOUS_KEYWORDS: &[&str] = &[
    ".env",
    "config",
    "secret",
    "credential",
    "key",
    "token",
    "password",
];

pub struct SecretPattern {
    pub name: &'static str,
    pub severity: Severity,
    regex: Regex,
}

impl SecretPattern {
    fn new(name: &'static str, severity: Severity, p: &str) -> Self {
        Self {
            name,
            severity,
            regex: pattern(p),
        }
    }

    /// Whether `text` contains something shaped like this secret.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

pub static SECRET_PATTERNS: LazyLock<Vec<SecretPattern>> = LazyLock::new(|| {
    use Severity::{High, Medium};
    vec![
        SecretPattern::new("AWS Access Key", High, r"AKIA[0-9A-Z]{16}"),
        SecretPattern::new(
            "AWS Secret Key",
            High,
            r#"(?i)aws_secret_access_key\s*=\s*["']?([A-Za-z0-9/+=]{40})["']?"#,
        ),
        SecretPattern::new("GitHub Token", High, r"gh[pousr]_[A-Za-z0-9]{36}"),
        SecretPattern::new(
            "Generic API Key",
            High,
            r#"(?i)api[_-]?key\s*[=:]\s*["']?([A-Za-z0-9_\-]{20,})["']?"#,
        ),
        SecretPattern::new(
            "Private Key",
            High,
            r"-----BEGIN (RSA |EC |DSA )?PRIVATE KEY-----",
        ),
        SecretPattern::new(
            "JWT Token",
            Medium,
            r"eyJ[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}",
        ),
        SecretPattern::new(
            "Database URL",
            High,
            r"(?i)(mongodb|mysql|postgres|redis)://[^\s]+:[^\s]+@[^\s]+",
        ),
        SecretPattern::new(
            "Slack Token",
            High,
            r"xox[baprs]-[0-9]{10,13}-[0-9]{10,13}-[A-Za-z0-9]{24,}",
        ),
        SecretPattern::new("Stripe Key", High, r"sk_live_[0-9a-zA-Z]{24}"),
        SecretPattern::new("Google API Key", High, r"AIza[0-9A-Za-z_-]{35}"),
        SecretPattern::new(
            "Password in Code",
            Medium,
            r#"(?i)(password|passwd|pwd)\s*[=:]\s*["']([^"'\s]{8,})["']"#,
        ),
        SecretPattern::new("Twilio Key", High, r"SK[0-9a-fA-F]{32}"),
        SecretPattern::new(
            "SendGrid Key",
            High,
            r"SG\.[A-Za-z0-9_-]{22}\.[A-Za-z0-9_-]{43}",
        ),
    ]
});

struct VulnerablePackage {
    name: &'static str,
    affected: &'static str,
    cve: &'static str,
    description: &'static str,
}

const KNOWN_VULNERABLE: &[VulnerablePackage] = &[
    VulnerablePackage {
        name: "lodash",
        affected: "<4.17.21",
        cve: "CVE-2021-23337",
        description: "Command injection",
    },
    VulnerablePackage {
        name: "axios",
        affected: "<0.21.3",
        cve: "CVE-2021-3749",
        description: "Server-side request forgery",
    },
    VulnerablePackage {
        name: "moment",
        affected: "<2.29.4",
        cve: "CVE-2022-31129",
        description: "Path traversal",
    },
    VulnerablePackage {
        name: "express",
        affected: "<4.17.3",
        cve: "CVE-2022-24999",
        description: "Open redirect",
    },
    VulnerablePackage {
        name: "minimist",
        affected: "<1.2.6",
        cve: "CVE-2021-44906",
        description: "Prototype pollution",
    },
    VulnerablePackage {
        name: "node-fetch",
        affected: "<2.6.7",
        cve: "CVE-2022-0235",
        description: "Exposure of sensitive information",
    },
    VulnerablePackage {
        name: "trim",
        affected: "<0.0.3",
        cve: "CVE-2020-7753",
        description: "Regular expression denial of service",
    },
    VulnerablePackage {
        name: "ua-parser-js",
        affected: "<0.7.33",
        cve: "CVE-2022-25927",
        description: "Malicious package",
    },
    VulnerablePackage {
        name: "path-parse",
        affected: "<1.0.7",
        cve: "CVE-2021-23343",
        description: "Regular expression denial of service",
    },
    VulnerablePackage {
        name: "ansi-regex",
        affected: "<5.0.1",
        cve: "CVE-2021-3807",
        description: "Regular expression denial of service",
    },
];

fn has_path(files: &[FileEntry], path: &str) -> bool {
    files.iter().any(|f| f.path == path)
}

fn has_env_file(files: &[FileEntry]) -> bool {
    has_path(files, ".env") || has_path(files, ".env.local")
}

/// Repository hygiene checks: .gitignore, committed env files, lock files
/// and sensitive-looking file names.
pub fn analyze_security_issues(files: &[FileEntry]) -> Vec<SecurityIssue> {
    let mut issues = Vec::new();

    if !has_path(files, ".gitignore") {
        issues.push(SecurityIssue::missing_gitignore());
    }
    if has_env_file(files) {
        issues.push(SecurityIssue::environment_file());
    }

    let has_lock = LOCK_FILES.iter().any(|l| has_path(files, l));
    if !has_lock && has_path(files, "package.json") {
        issues.push(SecurityIssue::missing_lock_file());
    }

    let suspicious: Vec<String> = files
        .iter()
        .filter(|f| {
            let lower = f.lower_path();
            SENSITIVE_NAMES.iter().any(|s| lower.contains(s))
        })
        .map(|f| f.path.clone())
        .collect();
    if !suspicious.is_empty() {
        issues.push(SecurityIssue::suspicious_files(suspicious));
    }

    issues
}

/// Attribute every secret pattern to each suspiciously named file.
///
/// Each suspicious file yields one finding per table entry, so a single
/// `config.yml` fills thirteen slots. Capped at 15 findings.
pub fn detect_secret_patterns(files: &[FileEntry]) -> Vec<SecretFinding> {
    files
        .iter()
        .filter(|f| !f.path.contains("node_modules") && !f.path.contains(".git"))
        .filter(|f| {
            let lower = f.lower_path();
            SUSPICIOUS_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .flat_map(|f| {
            SECRET_PATTERNS.iter().map(move |p| SecretFinding {
                file: f.path.clone(),
                kind: p.name.to_string(),
                severity: p.severity,
                line: SECRET_LINE.to_string(),
            })
        })
        .take(SECRET_FINDING_CAP)
        .collect()
}

/// Dependencies whose name appears in the known-vulnerable table. Versions
/// are reported, not compared.
pub fn analyze_vulnerabilities(deps: &DependencyMap) -> Vec<Vulnerability> {
    deps.scanned()
        .filter_map(|dep| {
            KNOWN_VULNERABLE
                .iter()
                .find(|v| v.name == dep.name)
                .map(|v| Vulnerability {
                    package: dep.name.clone(),
                    version: dep.version.clone(),
                    affected: v.affected.to_string(),
                    cve: v.cve.to_string(),
                    description: v.description.to_string(),
                    severity: Severity::High,
                })
        })
        .collect()
}

fn any_path_contains(files: &[FileEntry], needles: &[&str]) -> bool {
    files.iter().any(|f| {
        let lower = f.lower_path();
        needles.iter().any(|n| lower.contains(n))
    })
}

pub fn check_insecure_practices(files: &[FileEntry]) -> Vec<PracticeIssue> {
    let mut issues = Vec::new();

    let http_code = files.iter().any(|f| {
        matches!(
            f.extension().as_deref(),
            Some("js" | "jsx" | "ts" | "tsx" | "py")
        ) && f.lower_path().contains("http")
    });
    if http_code {
        issues.push(PracticeIssue {
            kind: "HTTP Usage".to_string(),
            description: "Files contain HTTP references, ensure HTTPS is enforced".to_string(),
            severity: Severity::Medium,
        });
    }

    let has_auth = any_path_contains(files, &["auth", "login"]);
    let has_session = any_path_contains(files, &["session", "jwt"]);
    if has_auth && !has_session {
        issues.push(PracticeIssue {
            kind: "Authentication".to_string(),
            description: "Authentication files found but no session management detected"
                .to_string(),
            severity: Severity::Medium,
        });
    }

    if any_path_contains(files, &["upload", "file"]) {
        issues.push(PracticeIssue {
            kind: "File Upload".to_string(),
            description: "File upload functionality detected, ensure proper validation"
                .to_string(),
            severity: Severity::Medium,
        });
    }

    issues
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChecklistItem {
    pub label: &'static str,
    pub passed: bool,
}

pub fn security_checklist(files: &[FileEntry]) -> Vec<ChecklistItem> {
    vec![
        ChecklistItem {
            label: ".gitignore file present",
            passed: has_path(files, ".gitignore"),
        },
        ChecklistItem {
            label: "License file present",
            passed: any_path_contains(files, &["license"]),
        },
        ChecklistItem {
            label: "No .env files in repo",
            passed: !has_env_file(files),
        },
        ChecklistItem {
            label: "Lock file for dependencies",
            passed: LOCK_FILES[..3].iter().any(|l| has_path(files, l)),
        },
    ]
}
