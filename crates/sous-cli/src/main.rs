mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{cook::CookSubcommand, recipe::RecipeSubcommand, timer::TimerSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sous",
    about = "Guided cooking sessions from your terminal — mise en place, step-by-step walkthrough, timers",
    version,
    propagate_version = true
)]
struct Cli {
    /// Kitchen root (default: walk up looking for .sous/, then $HOME)
    #[arg(long, global = true, env = "SOUS_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a kitchen in the current directory
    Init,

    /// Manage the recipe library
    Recipe {
        #[command(subcommand)]
        subcommand: RecipeSubcommand,
    },

    /// Drive a guided cooking session
    Cook {
        #[command(subcommand)]
        subcommand: CookSubcommand,
    },

    /// Manage countdown timers on a session
    Timer {
        #[command(subcommand)]
        subcommand: TimerSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Recipe { subcommand } => cmd::recipe::run(&root, subcommand, cli.json),
        Commands::Cook { subcommand } => cmd::cook::run(&root, subcommand, cli.json),
        Commands::Timer { subcommand } => cmd::timer::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
