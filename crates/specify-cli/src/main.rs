mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{init::InitArgs, spa::SpaSubcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "specify",
    about = "Scaffold spec-driven development projects for AI coding assistants",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .specify/ or .git/)
    #[arg(long, global = true, env = "SPECIFY_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project from the spec-driven templates
    Init(InitArgs),

    /// Check that git and the AI assistant CLIs are installed
    Check {
        /// Disable TLS certificate verification for the release check
        #[arg(long)]
        skip_tls: bool,

        /// Skip the template release check
        #[arg(long, env = "SPECIFY_OFFLINE")]
        offline: bool,
    },

    /// Manage the AnkerSPA multi-agent workspace
    Spa {
        #[command(subcommand)]
        subcommand: SpaSubcommand,
    },
}

/// `RUST_LOG` when it parses, otherwise warnings only.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Init(args) => cmd::init::run(args, cli.json),
        Commands::Check { skip_tls, offline } => cmd::check::run(skip_tls, offline, cli.json),
        Commands::Spa { subcommand } => {
            let root = root::resolve_root(cli.root.as_deref());
            cmd::spa::run(&root, subcommand, cli.json)
        }
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
