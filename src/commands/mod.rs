mod analyze;
mod export;
mod graph;
mod init;
mod search;
mod tree;

pub use analyze::cmd_analyze;
pub use export::cmd_export;
pub use graph::cmd_graph;
pub use init::cmd_init;
pub use search::cmd_search;
pub use tree::cmd_tree;

use crate::api::{self, GitnavError};
use crate::cli::TargetArgs;
use crate::config::Config;
use crate::fs::FileSystem;
use crate::model::{AnalysisResult, RepoId};
use crate::source::FetchError;
use crate::style;
use std::path::{Path, PathBuf};

/// Repository a command works on.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Remote(RepoId),
    Local(PathBuf),
}

impl Target {
    pub fn from_args(args: &TargetArgs) -> Result<Self, GitnavError> {
        if let Some(path) = &args.local {
            return Ok(Target::Local(path.clone()));
        }
        let spec = args
            .repo
            .as_deref()
            .ok_or_else(|| GitnavError::InvalidTarget("no repository given".to_string()))?;
        spec.parse().map(Target::Remote).map_err(GitnavError::InvalidTarget)
    }

    /// Directory `.gitnav.toml` is read from.
    fn config_dir(&self) -> &Path {
        match self {
            Target::Local(path) => path,
            Target::Remote(_) => Path::new("."),
        }
    }
}

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub target: Target,
    pub config: Config,
    token: Option<String>,
    runtime: tokio::runtime::Runtime,
}

impl CommandContext {
    /// Resolve the target, load config and start the async runtime.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(args: &TargetArgs) -> Result<Self, i32> {
        let target = match Target::from_args(args) {
            Ok(target) => target,
            Err(e) => {
                style::error(&e.to_string());
                style::hint("Pass owner/repo, a github.com URL, or --local PATH");
                return Err(1);
            }
        };

        let config = Config::load(target.config_dir()).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                style::error(&format!("Could not start async runtime: {}", e));
                return Err(1);
            }
        };

        Ok(Self {
            target,
            config,
            token: args.token.clone(),
            runtime,
        })
    }

    /// Fetch and analyze the target, reporting failures to the user.
    pub fn analyze(&self) -> Result<AnalysisResult, i32> {
        let outcome = match &self.target {
            Target::Remote(repo) => {
                let url = format!("https://github.com/{}", repo);
                style::status(&format!("Fetching {}", style::url(&url)));
                self.runtime
                    .block_on(api::analyze_github(repo, &self.config, self.token.clone()))
            }
            Target::Local(path) => {
                style::status(&format!("Scanning {}", style::path(path)));
                self.runtime.block_on(api::analyze_local(path))
            }
        };

        outcome.map_err(|e| {
            report_error(&e);
            1
        })
    }
}

/// Print an error and, for fetch failures, what the user can do about it.
pub fn report_error(err: &GitnavError) {
    style::error(&err.to_string());
    if let GitnavError::Fetch(fetch) = err {
        for step in fetch.remediation() {
            style::hint(step);
        }
        if matches!(fetch, FetchError::RateLimited { .. }) {
            style::hint("Anonymous requests are limited to 60 per hour");
        }
    }
}

/// Write `content` to `output`, or stdout when there is no output path.
pub fn write_output(output: Option<&Path>, content: &str, fs: &dyn FileSystem) -> i32 {
    match output {
        Some(path) => {
            if let Err(e) = fs.write(path, content) {
                style::error(&format!("Could not write {}: {}", style::path(path), e));
                return 1;
            }
            style::success(&format!("Wrote {}", style::path(path)));
            0
        }
        None => {
            print!("{}", content);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;

    #[test]
    fn test_target_from_args() {
        let remote = TargetArgs {
            repo: Some("https://github.com/octo/demo".into()),
            ..Default::default()
        };
        assert_eq!(
            Target::from_args(&remote).unwrap(),
            Target::Remote(RepoId::new("octo", "demo"))
        );

        let local = TargetArgs {
            local: Some(PathBuf::from("/work/demo")),
            ..Default::default()
        };
        assert_eq!(
            Target::from_args(&local).unwrap(),
            Target::Local(PathBuf::from("/work/demo"))
        );

        let bad = TargetArgs {
            repo: Some("demo".into()),
            ..Default::default()
        };
        assert!(matches!(
            Target::from_args(&bad),
            Err(GitnavError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_write_output_to_file() {
        let fs = MockFs::new();
        let code = write_output(Some(Path::new("/out/report.md")), "# demo\n", &fs);
        assert_eq!(code, 0);
        assert_eq!(fs.files()["/out/report.md"], "# demo\n");
    }
}
