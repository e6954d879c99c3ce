use super::ui;
use crate::core::config::{AppConfig, OutputFormat};
use crate::core::{AssetPrices, Snapshot, SnapshotKind};
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

impl Snapshot {
    pub fn display_as_table(&self, precision: u32) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Location"),
            ui::header_cell("Asset"),
            ui::header_cell("Amount"),
            ui::header_cell("Value (USD)"),
        ]);

        for row in self.holdings() {
            let location = if row.location.is_empty() {
                ui::empty_cell()
            } else {
                Cell::new(&row.location)
            };
            let asset = if row.liability {
                Cell::new(format!("{} (liability)", row.asset))
            } else {
                Cell::new(&row.asset)
            };

            table.add_row(vec![
                location,
                asset,
                ui::decimal_cell(row.holding.amount, precision),
                ui::usd_cell(row.holding.usd_value, precision, row.liability),
            ]);
        }

        let mut output = format!(
            "Balances: {}\n\n",
            ui::style_text(&self.kind().to_string(), ui::StyleType::Title)
        );
        output.push_str(&table.to_string());

        let total = format!("{:.*}", precision as usize, self.total_usd_value());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Total Value (USD)", ui::StyleType::TotalLabel),
            ui::style_text(&total, ui::StyleType::TotalValue)
        ));

        let liabilities = self.total_liabilities();
        if !liabilities.is_zero() {
            let liabilities = format!("{:.*}", precision as usize, liabilities);
            output.push_str(&format!(
                "\n{}: {}",
                ui::style_text("Total Liabilities (USD)", ui::StyleType::Subtle),
                ui::style_text(&liabilities, ui::StyleType::Liability)
            ));
        }

        output
    }
}

pub fn load_prices(path: &Path) -> Result<AssetPrices> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read price table: {}", path.display()))?;
    let prices: AssetPrices = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse price table: {}", path.display()))?;
    debug!("Loaded {} prices from {}", prices.len(), path.display());
    Ok(prices)
}

pub fn load_snapshot(kind: SnapshotKind, path: &Path) -> Result<Snapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read balances: {}", path.display()))?;
    Snapshot::parse_with_context(kind, &content)
        .with_context(|| format!("Invalid balances file: {}", path.display()))
}

/// Revalues a balances file against a price table and renders the result.
pub fn render(
    config: &AppConfig,
    kind: SnapshotKind,
    balances_path: &Path,
    prices_path: Option<&str>,
    force_json: bool,
) -> Result<String> {
    let snapshot = load_snapshot(kind, balances_path)?;
    let prices = load_prices(&config.resolve_prices_path(prices_path)?)?;

    let merged = snapshot.merge(&prices);
    info!(
        "Revalued {} holdings from {}",
        merged.holdings().len(),
        balances_path.display()
    );

    let format = if force_json {
        OutputFormat::Json
    } else {
        config.display.format
    };
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&merged).context("Failed to serialize balances")
        }
        OutputFormat::Table => Ok(merged.display_as_table(config.display.precision)),
    }
}

pub fn run(
    config: &AppConfig,
    kind: SnapshotKind,
    balances_path: &Path,
    prices_path: Option<&str>,
    force_json: bool,
) -> Result<()> {
    let output = render(config, kind, balances_path, prices_path, force_json)?;
    println!("{output}");
    Ok(())
}
