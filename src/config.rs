use crate::analysis::DEFAULT_MAX_RESULTS;
use crate::fs::FileSystem;
use crate::graph::GraphSettings;
use crate::source::GITHUB_API;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".gitnav.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub cache: CacheConfig,
    pub graph: GraphSettings,
    pub search: SearchConfig,
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheConfig {
    pub ttl: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub max_results: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GitHubConfig {
    pub api_url: String,
    /// Environment variable holding the access token.
    pub token_env: String,
    pub commit_details: bool,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    cache: Option<RawCache>,
    graph: Option<RawGraph>,
    search: Option<RawSearch>,
    github: Option<RawGitHub>,
}

#[derive(Debug, Deserialize)]
struct RawCache {
    ttl_minutes: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawGraph {
    max_files: Option<usize>,
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    max_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawGitHub {
    api_url: Option<String>,
    token_env: Option<String>,
    commit_details: Option<bool>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: GITHUB_API.to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            commit_details: false,
        }
    }
}

impl Config {
    /// Load `.gitnav.toml` from `dir`, or defaults when there is none.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with_fs(dir, crate::fs::default_fs())
    }

    pub fn load_with_fs(dir: &Path, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);
        if !fs.exists(&config_path) {
            return Ok(Self::default());
        }

        let content = fs.read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let cache = match raw.cache.and_then(|c| c.ttl_minutes) {
            Some(minutes) => CacheConfig {
                ttl: Duration::from_secs(minutes * 60),
            },
            None => defaults.cache,
        };

        let graph = match raw.graph {
            Some(g) => GraphSettings {
                max_files: g.max_files.unwrap_or(defaults.graph.max_files),
                width: g.width.unwrap_or(defaults.graph.width),
                height: g.height.unwrap_or(defaults.graph.height),
            },
            None => defaults.graph,
        };

        let search = match raw.search.and_then(|s| s.max_results) {
            Some(max_results) => SearchConfig { max_results },
            None => defaults.search,
        };

        let github = match raw.github {
            Some(g) => GitHubConfig {
                api_url: g.api_url.unwrap_or(defaults.github.api_url),
                token_env: g.token_env.unwrap_or(defaults.github.token_env),
                commit_details: g.commit_details.unwrap_or(defaults.github.commit_details),
            },
            None => defaults.github,
        };

        Ok(Self {
            cache,
            graph,
            search,
            github,
        })
    }

    /// Token from the configured environment variable, if set and non-empty.
    pub fn token_from_env(&self) -> Option<String> {
        std::env::var(&self.github.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Starter `.gitnav.toml` with every setting at its default.
pub fn generate_config_template() -> String {
    let defaults = Config::default();
    format!(
        r#"# gitnav configuration

[cache]
# Minutes an analysis stays fresh before it is fetched again
ttl_minutes = {ttl}

[graph]
# Files shown in the visualization, in listing order
max_files = {max_files}
width = {width:.1}
height = {height:.1}

[search]
max_results = {max_results}

[github]
api_url = "{api_url}"
# Environment variable holding a personal access token
token_env = "{token_env}"
# Fetch changed files for each commit (one request per commit)
commit_details = {commit_details}
"#,
        ttl = defaults.cache.ttl.as_secs() / 60,
        max_files = defaults.graph.max_files,
        width = defaults.graph.width,
        height = defaults.graph.height,
        max_results = defaults.search.max_results,
        api_url = defaults.github.api_url,
        token_env = defaults.github.token_env,
        commit_details = defaults.github.commit_details,
    )
}
