use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Repository hygiene finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityIssue {
    pub severity: Severity,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

impl SecurityIssue {
    pub fn missing_gitignore() -> Self {
        Self {
            severity: Severity::Medium,
            title: "Missing .gitignore".to_string(),
            description: "No .gitignore file found. Sensitive files might be committed."
                .to_string(),
            files: None,
        }
    }

    pub fn environment_file() -> Self {
        Self {
            severity: Severity::High,
            title: "Environment file in repository".to_string(),
            description: ".env file detected. This may contain sensitive credentials."
                .to_string(),
            files: None,
        }
    }

    pub fn missing_lock_file() -> Self {
        Self {
            severity: Severity::Low,
            title: "No lock file found".to_string(),
            description: "Consider using a lock file for reproducible builds.".to_string(),
            files: None,
        }
    }

    pub fn suspicious_files(paths: Vec<String>) -> Self {
        Self {
            severity: Severity::High,
            title: "Suspicious files detected".to_string(),
            description: format!(
                "Found {} file(s) with potentially sensitive names.",
                paths.len()
            ),
            files: Some(paths),
        }
    }
}

/// A secret-pattern type attributed to a suspiciously named file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecretFinding {
    pub file: String,
    pub kind: String,
    pub severity: Severity,
    pub line: String,
}

/// Dependency matching a known-vulnerable package entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vulnerability {
    pub package: String,
    pub version: String,
    pub affected: String,
    pub cve: String,
    pub description: String,
    pub severity: Severity,
}

/// Practice-level warning inferred from path names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PracticeIssue {
    pub kind: String,
    pub description: String,
    pub severity: Severity,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" | "med" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering_and_parsing() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert!("critical".parse::<Severity>().is_err());
        assert_eq!(Severity::Medium.to_string(), "medium");
    }

    #[test]
    fn test_suspicious_files_lists_paths() {
        let issue = SecurityIssue::suspicious_files(vec!["config/secret.yml".to_string()]);
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(
            issue.description,
            "Found 1 file(s) with potentially sensitive names."
        );
        assert_eq!(issue.files.unwrap(), vec!["config/secret.yml"]);
    }
}
