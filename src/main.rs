use anyhow::Result;
use clap::{Parser, Subcommand};

use seodash::cli;

#[derive(Debug, Parser)]
#[command(name = "seodash")]
#[command(about = "Operator dashboard for a local SEO tools backend")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Launch the web dashboard
    Serve {
        /// Address to bind (default from config: 127.0.0.1:9750)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_open: bool,
    },
    /// Probe the backend once and print its status
    Status,
    /// Start one tool against a target URL
    Start {
        /// Tool key: click, campaign, safety, review
        tool: String,
        /// Target product or shop URL
        #[arg(long)]
        url: String,
    },
    /// Interactive command console with a live activity log
    Console,
    /// Probe the backend and export the session log to a text file
    Export {
        /// Directory for the export file (default from config)
        #[arg(long)]
        dir: Option<String>,
    },
    /// List the known tools and their endpoints
    Tools,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config file to ~/.seodash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `seodash config set backend.transport proxy`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { addr, no_open } => cli::run_serve(addr, no_open),
        Commands::Status => cli::run_status(),
        Commands::Start { tool, url } => cli::run_start(&tool, &url),
        Commands::Console => cli::run_console(),
        Commands::Export { dir } => cli::run_export(dir),
        Commands::Tools => cli::run_tools(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
