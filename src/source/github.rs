use super::{FetchError, RepositorySource};
use crate::model::{Commit, Contributor, RepoId, RepoInfo, TreeItem};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const GITHUB_API: &str = "https://api.github.com";
const COMMITS_PER_PAGE: u32 = 30;
const CONTRIBUTORS_PER_PAGE: u32 = 10;

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
    #[serde(default)]
    encoding: String,
}

/// GitHub REST v3 client.
pub struct GitHubSource {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    commit_details: bool,
}

impl GitHubSource {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            commit_details: false,
        })
    }

    /// Also fetch per-commit file lists. Costs one request per commit.
    pub fn with_commit_details(mut self, enabled: bool) -> Self {
        self.commit_details = enabled;
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("gitnav/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("token {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        repo: &RepoId,
        endpoint: &str,
    ) -> Result<T, FetchError> {
        let url = format!("{}/repos/{}/{}", self.api_url, repo, endpoint);
        let url = url.trim_end_matches('/');
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reset = response
                .headers()
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<i64>().ok())
                .map(minutes_until);
            return Err(FetchError::from_status(status.as_u16(), repo, reset));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Like `get_json`, but a 404 means the endpoint's resource is missing,
    /// not the repository.
    async fn get_resource<T: DeserializeOwned>(
        &self,
        repo: &RepoId,
        endpoint: &str,
    ) -> Result<T, FetchError> {
        match self.get_json(repo, endpoint).await {
            Err(FetchError::NotFound { .. }) => Err(FetchError::Http { status: 404 }),
            other => other,
        }
    }
}

/// Whole minutes until the epoch-seconds `reset`, rounded up.
fn minutes_until(reset: i64) -> i64 {
    let remaining = reset - chrono::Utc::now().timestamp();
    (remaining.max(0) + 59) / 60
}

/// Decode a contents-API payload. The host wraps base64 at 60 columns.
fn decode_content(content: &str, encoding: &str) -> Result<String, FetchError> {
    if !encoding.is_empty() && encoding != "base64" {
        return Err(FetchError::Decode(format!("unsupported encoding {}", encoding)));
    }
    let cleaned: String = content.split_whitespace().collect();
    let bytes = BASE64
        .decode(cleaned)
        .map_err(|e| FetchError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| FetchError::Decode(e.to_string()))
}

#[async_trait]
impl RepositorySource for GitHubSource {
    async fn repo_info(&self, repo: &RepoId) -> Result<RepoInfo, FetchError> {
        self.get_json(repo, "").await
    }

    async fn tree(&self, repo: &RepoId, branch: &str) -> Result<Vec<TreeItem>, FetchError> {
        let response: TreeResponse = self
            .get_resource(repo, &format!("git/trees/{}?recursive=1", branch))
            .await?;
        if response.truncated {
            tracing::warn!(repo = %repo, "tree listing truncated by the host");
        }
        Ok(response.tree)
    }

    async fn commits(&self, repo: &RepoId) -> Result<Vec<Commit>, FetchError> {
        let mut commits: Vec<Commit> = self
            .get_resource(repo, &format!("commits?per_page={}", COMMITS_PER_PAGE))
            .await?;

        if self.commit_details {
            for commit in commits.iter_mut() {
                match self
                    .get_resource::<Commit>(repo, &format!("commits/{}", commit.sha))
                    .await
                {
                    Ok(detail) => commit.files = detail.files,
                    Err(e) => tracing::debug!(sha = %commit.sha, error = %e, "commit detail unavailable"),
                }
            }
        }
        Ok(commits)
    }

    async fn contributors(&self, repo: &RepoId) -> Result<Vec<Contributor>, FetchError> {
        self.get_resource(
            repo,
            &format!("contributors?per_page={}", CONTRIBUTORS_PER_PAGE),
        )
        .await
    }

    async fn file_text(&self, repo: &RepoId, path: &str) -> Result<String, FetchError> {
        let response: ContentResponse = self
            .get_resource(repo, &format!("contents/{}", path))
            .await?;
        decode_content(&response.content, &response.encoding)
    }
}
