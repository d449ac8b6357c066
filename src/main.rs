use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};
use colored::Colorize;
use lookout::{LookoutContext, commands};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lookout",
    version = lookout::VERSION,
    about = "Coding-project discovery and velocity tracker",
    long_about = "Discovers projects under watched directories, snapshots their \
                  git state and file statistics, and tracks activity over time"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan watch paths and record a snapshot per project
    Scan,

    /// Show a summary of all tracked projects
    Status,

    /// Show details for one tracked project
    Show {
        /// Project path
        path: String,
    },

    /// Manage watched directories
    Watch {
        #[command(subcommand)]
        action: WatchAction,
    },

    /// Get and set configuration options
    Config {
        /// Configuration key (section.key)
        key: Option<String>,

        /// Configuration value to set
        value: Option<String>,

        /// List all configuration values
        #[arg(short, long)]
        list: bool,

        /// Reset the key to its default value
        #[arg(short, long)]
        unset: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum WatchAction {
    /// Add a directory to the watch list
    Add {
        /// Directory to watch
        path: String,
    },

    /// Remove a directory from the watch list
    Remove {
        /// Directory to stop watching
        path: String,
    },

    /// List watched directories
    List,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
        Commands::Scan => {
            let ctx = LookoutContext::new()?;
            commands::scan::execute(&ctx)
        }
        Commands::Status => {
            let ctx = LookoutContext::new()?;
            commands::status::execute(&ctx)
        }
        Commands::Show { path } => {
            let ctx = LookoutContext::new()?;
            commands::show::execute(&ctx, &path)
        }
        Commands::Watch { action } => {
            let mut ctx = LookoutContext::new()?;
            match action {
                WatchAction::Add { path } => commands::watch::add(&mut ctx, &path),
                WatchAction::Remove { path } => commands::watch::remove(&mut ctx, &path),
                WatchAction::List => {
                    commands::watch::list(&ctx);
                    Ok(())
                }
            }
        }
        Commands::Config {
            key,
            value,
            list,
            unset,
        } => {
            let mut ctx = LookoutContext::new()?;
            commands::config::execute(&mut ctx, key.as_deref(), value.as_deref(), list, unset)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "lookout=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
