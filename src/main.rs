use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Raven - install and manage Death's Door mods
#[derive(Parser)]
#[command(name = "raven")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Point Raven at the game and install the BepInEx mod loader
    Setup {
        /// Game directory, or the path to DeathsDoor.exe
        location: PathBuf,
    },

    /// Install mods and their dependencies
    Install {
        /// Mod names; any unambiguous part of a name will do
        #[arg(required = true)]
        mods: Vec<String>,
    },

    /// List available mods
    List {
        /// Display detailed information about mods
        #[arg(short, long)]
        detailed: bool,

        /// Show only installed mods
        #[arg(short, long)]
        installed: bool,

        /// Search for mods whose name contains this term
        #[arg(short, long, value_name = "TERM")]
        search: Option<String>,
    },

    /// Uninstall mods
    Yeet {
        /// Installed mod names; any unambiguous part of a name will do
        #[arg(required = true)]
        mods: Vec<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RAVEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Setup { location } => commands::setup::run(location),
        Commands::Install { mods } => commands::install::run(mods),
        Commands::List {
            detailed,
            installed,
            search,
        } => commands::list::run(detailed, installed, search),
        Commands::Yeet { mods } => commands::yeet::run(mods),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "raven", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
