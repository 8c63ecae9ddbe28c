mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, idea::IdeaSubcommand, project::ProjectSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hatch",
    about = "Community ideas and the wizard that turns them into projects",
    version,
    propagate_version = true
)]
struct Cli {
    /// Platform root (default: auto-detect from .hatch/)
    #[arg(long, global = true, env = "HATCH_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a platform in the current directory
    Init {
        /// Platform name (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Manage ideas
    Idea {
        #[command(subcommand)]
        subcommand: IdeaSubcommand,
    },

    /// Inspect projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Convert an idea into a project (reads wizard commands from stdin)
    Convert {
        /// Idea slug
        idea: String,
    },

    /// Validate the platform configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Serve the HTTP API
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "0")]
        port: u16,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref(), cli.json),
        Commands::Idea { subcommand } => cmd::idea::run(&root, subcommand, cli.json),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
        Commands::Convert { idea } => cmd::convert::run(&root, &idea, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Ui { port, no_open } => cmd::ui::run(&root, port, no_open),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
