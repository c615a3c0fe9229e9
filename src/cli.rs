use crate::analysis::{Category, SizeBand};
use crate::output::ExportKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gitnav")]
#[command(about = "Explore and analyze GitHub repositories from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze a repository and print a report
    Analyze(AnalyzeArgs),

    /// Run the force-directed layout headless and write it as JSON
    Graph(GraphArgs),

    /// Fuzzy-search the files of a repository
    Search(SearchArgs),

    /// Print the folder hierarchy of a repository
    Tree(TreeArgs),

    /// Export a report as JSON, Markdown or Mermaid
    Export(ExportArgs),

    /// Generate a starter .gitnav.toml configuration file
    Init(InitArgs),
}

/// Which repository to look at.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// GitHub repository as owner/repo or a github.com URL
    #[arg(required_unless_present = "local", conflicts_with = "local")]
    pub repo: Option<String>,

    /// Analyze a checkout on disk instead of GitHub
    #[arg(long, value_name = "PATH")]
    pub local: Option<PathBuf>,

    /// GitHub access token (defaults to the configured environment variable)
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct GraphArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Simulation frames to run before writing the layout
    #[arg(long, default_value = "300")]
    pub steps: u64,

    /// Seed for the initial scatter, for reproducible layouts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Characters to match in order against file paths
    #[arg(long, short, default_value = "")]
    pub query: String,

    /// Only files in this category
    #[arg(long)]
    pub category: Option<Category>,

    /// Only files with this extension (without the dot)
    #[arg(long = "ext")]
    pub extension: Option<String>,

    /// Only files in this size band
    #[arg(long)]
    pub size: Option<SizeBand>,

    /// Maximum number of results (defaults to the configured limit)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct TreeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Stop descending below this depth
    #[arg(long)]
    pub depth: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Report kind
    #[arg(short, long, default_value = "markdown")]
    pub kind: ExportKind,

    /// Output file (defaults to <repo>-<kind> in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .gitnav.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_remote() {
        let cli = Cli::parse_from(["gitnav", "analyze", "octo/demo", "--format", "json"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.target.repo.as_deref(), Some("octo/demo"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_search_filters() {
        let cli = Cli::parse_from([
            "gitnav", "-v", "search", "--local", ".", "-q", "app", "--category", "frontend",
            "--ext", "jsx", "--size", "small",
        ]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert!(cli.verbose);
        assert!(args.target.repo.is_none());
        assert_eq!(args.target.local, Some(PathBuf::from(".")));
        assert_eq!(args.category, Some(Category::Frontend));
        assert_eq!(args.extension.as_deref(), Some("jsx"));
        assert_eq!(args.size, Some(SizeBand::Small));
    }

    #[test]
    fn test_target_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["gitnav", "tree"]).is_err());
        assert!(Cli::try_parse_from(["gitnav", "tree", "octo/demo", "--local", "."]).is_err());
    }

    #[test]
    fn test_export_kind_names() {
        let cli = Cli::parse_from(["gitnav", "export", "octo/demo", "--kind", "mermaid-detailed"]);
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.kind, ExportKind::MermaidDetailed);
    }
}
