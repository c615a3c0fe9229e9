use clap::Parser;
use gitnav::cli::{Cli, Command};
use gitnav::{cmd_analyze, cmd_export, cmd_graph, cmd_init, cmd_search, cmd_tree};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Command::Analyze(args) => cmd_analyze(args),
        Command::Graph(args) => cmd_graph(args),
        Command::Search(args) => cmd_search(args),
        Command::Tree(args) => cmd_tree(args),
        Command::Export(args) => cmd_export(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}

/// Logs go to stderr so reports on stdout stay clean. `RUST_LOG` wins over
/// `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "gitnav=debug" } else { "gitnav=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
