pub mod cli;
pub mod core;

use crate::core::SnapshotKind;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Value {
        kind: SnapshotKind,
        balances: PathBuf,
        prices: Option<String>,
        json: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("balval starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Value {
            kind,
            balances,
            prices,
            json,
        } => cli::value::run(&config, kind, &balances, prices.as_deref(), json),
    }
}
