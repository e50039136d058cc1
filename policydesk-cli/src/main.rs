//! Main entry point for the PolicyDesk CLI.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::config::ClientConfig;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// PolicyDesk CLI
#[derive(Parser, Debug)]
#[command(name = "policydesk")]
#[command(about = "Command-line client for the PolicyDesk policy API", long_about = None)]
struct Cli {
    /// Path to the configuration file (optional)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to a configuration file (policydesk.toml or policydesk.json). If not provided, defaults and POLICYDESK_* variables are used."
    )]
    config: Option<PathBuf>,

    /// API origin override
    #[arg(
        long,
        global = true,
        help = "Origin of the policy API (e.g., http://localhost:8000). Overrides the configuration file and POLICYDESK_API_URL."
    )]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the PolicyDesk CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive session against the policy API
    Shell,

    /// Print the resolved configuration
    Config {
        /// Output format (toml or json). Defaults to toml.
        #[arg(
            long,
            short,
            help = "Output format of the configuration (toml or json). Defaults to toml."
        )]
        format: Option<String>,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: String,
    },
}

/// Log to stderr so the shell's own output stays clean. `RUST_LOG` wins
/// over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Shell => {
            let config = ClientConfig::load_config(cli.config, cli.api_url)?;
            init_tracing(&config.log_level);
            commands::shell::run(&config).await?;
        }
        Commands::Config { format, output } => {
            let config = ClientConfig::load_config(cli.config, cli.api_url)?;
            let format = format.unwrap_or_else(|| "toml".to_string());
            commands::config::write_config(&config, &format, output.as_deref())?;
        }
        Commands::Completion { shell } => {
            let shell = shell
                .parse::<clap_complete::Shell>()
                .map_err(|err| anyhow!("invalid shell type: {err}"))?;
            commands::completion::generate_completion(shell);
        }
    }

    Ok(())
}
