use anyhow::Result;
use balval::core::SnapshotKind;
use balval::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Recompute USD values of a balances snapshot
    Value {
        /// Snapshot shape: totals, simple, blockchain, account or utxo
        #[arg(short, long)]
        kind: SnapshotKind,

        /// JSON file with the balances snapshot
        #[arg(short, long)]
        balances: PathBuf,

        /// JSON price table (defaults to prices_path from config)
        #[arg(short, long)]
        prices: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let result = match cli.command {
        Some(Commands::Setup) => balval::cli::setup::setup(),
        Some(Commands::Value {
            kind,
            balances,
            prices,
            json,
        }) => {
            let command = balval::AppCommand::Value {
                kind,
                balances,
                prices,
                json,
            };
            balval::run_command(command, cli.config_path.as_deref()).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
