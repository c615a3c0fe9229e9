use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as listed by the host. Field layout follows the REST payload so
/// responses deserialize directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    #[serde(default)]
    pub sha: String,
    pub commit: CommitDetail,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<CommitFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitFile {
    pub filename: String,
    #[serde(default)]
    pub status: String,
}

impl Commit {
    pub fn new(sha: impl Into<String>, message: impl Into<String>, author: &str, date: &str) -> Self {
        Self {
            sha: sha.into(),
            commit: CommitDetail {
                message: message.into(),
                author: Some(CommitAuthor {
                    name: author.to_string(),
                    date: Some(date.to_string()),
                }),
            },
            files: None,
            html_url: None,
        }
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        self.files = Some(
            files
                .into_iter()
                .map(|(filename, status)| CommitFile {
                    filename: filename.into(),
                    status: status.into(),
                })
                .collect(),
        );
        self
    }

    /// Author timestamp, if present and well-formed.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        let raw = self.commit.author.as_ref()?.date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    pub fn author_name(&self) -> &str {
        self.commit
            .author
            .as_ref()
            .map(|a| a.name.as_str())
            .unwrap_or("")
    }

    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.commit.message.lines().next().unwrap_or("")
    }

    pub fn changed_files(&self) -> &[CommitFile] {
        self.files.as_deref().unwrap_or(&[])
    }
}
