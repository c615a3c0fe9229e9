pub mod analysis;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fs;
pub mod graph;
pub mod model;
pub mod output;
pub mod session;
pub mod source;
pub mod style;

pub use api::{
    GitnavError, analyze_github, analyze_local, analyze_with, export, github_source, search,
    simulate_layout,
};
pub use cli::Cli;
pub use commands::{cmd_analyze, cmd_export, cmd_graph, cmd_init, cmd_search, cmd_tree};
pub use config::Config;
pub use model::{AnalysisResult, RepoId};
pub use session::AnalysisSession;
