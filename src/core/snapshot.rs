//! A balances snapshot of any supported shape

use crate::core::balance::{
    AccountAssetBalances, AssetBalances, AssetPrices, BlockchainBalances, Holding, Totals,
    UtxoBalances,
};
use crate::core::prices;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    Totals,
    Simple,
    Blockchain,
    Account,
    Utxo,
}

impl Display for SnapshotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SnapshotKind::Totals => "totals",
                SnapshotKind::Simple => "simple",
                SnapshotKind::Blockchain => "blockchain",
                SnapshotKind::Account => "account",
                SnapshotKind::Utxo => "utxo",
            }
        )
    }
}

impl FromStr for SnapshotKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "totals" => Ok(SnapshotKind::Totals),
            "simple" => Ok(SnapshotKind::Simple),
            "blockchain" => Ok(SnapshotKind::Blockchain),
            "account" => Ok(SnapshotKind::Account),
            "utxo" | "btc" => Ok(SnapshotKind::Utxo),
            _ => Err(anyhow::anyhow!("Invalid snapshot kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    Totals(Totals),
    Simple(AssetBalances),
    Blockchain(BlockchainBalances),
    Account(AccountAssetBalances),
    Utxo(UtxoBalances),
}

/// A single leaf holding with its location in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingRow {
    pub location: String,
    pub asset: String,
    pub holding: Holding,
    pub liability: bool,
}

impl HoldingRow {
    fn new(location: impl Into<String>, asset: impl Into<String>, holding: &Holding) -> Self {
        Self {
            location: location.into(),
            asset: asset.into(),
            holding: *holding,
            liability: false,
        }
    }
}

impl Snapshot {
    /// Parses a JSON document as a snapshot of the given kind.
    pub fn parse(kind: SnapshotKind, json: &str) -> Result<Self> {
        let snapshot = match kind {
            SnapshotKind::Totals => Snapshot::Totals(serde_json::from_str(json)?),
            SnapshotKind::Simple => Snapshot::Simple(serde_json::from_str(json)?),
            SnapshotKind::Blockchain => Snapshot::Blockchain(serde_json::from_str(json)?),
            SnapshotKind::Account => Snapshot::Account(serde_json::from_str(json)?),
            SnapshotKind::Utxo => Snapshot::Utxo(serde_json::from_str(json)?),
        };
        Ok(snapshot)
    }

    /// Parses with a context message naming the kind.
    pub fn parse_with_context(kind: SnapshotKind, json: &str) -> Result<Self> {
        Self::parse(kind, json).with_context(|| format!("Failed to parse {kind} balances"))
    }

    pub fn kind(&self) -> SnapshotKind {
        match self {
            Snapshot::Totals(_) => SnapshotKind::Totals,
            Snapshot::Simple(_) => SnapshotKind::Simple,
            Snapshot::Blockchain(_) => SnapshotKind::Blockchain,
            Snapshot::Account(_) => SnapshotKind::Account,
            Snapshot::Utxo(_) => SnapshotKind::Utxo,
        }
    }

    /// Applies the merge operation matching this snapshot's shape.
    pub fn merge(&self, prices: &AssetPrices) -> Snapshot {
        match self {
            Snapshot::Totals(t) => Snapshot::Totals(prices::merge_totals(t, prices)),
            Snapshot::Simple(b) => Snapshot::Simple(prices::merge_simple_balances(b, prices)),
            Snapshot::Blockchain(b) => {
                Snapshot::Blockchain(prices::merge_blockchain_balances(b, prices))
            }
            Snapshot::Account(b) => {
                Snapshot::Account(prices::merge_account_asset_balances(b, prices))
            }
            Snapshot::Utxo(b) => Snapshot::Utxo(prices::merge_utxo_balances(b, prices)),
        }
    }

    /// Flattens the snapshot into leaf rows, in container order.
    pub fn holdings(&self) -> Vec<HoldingRow> {
        let mut rows = Vec::new();
        match self {
            Snapshot::Totals(totals) => {
                for (chain, balances) in totals {
                    for (asset, holding) in balances {
                        rows.push(HoldingRow::new(chain, asset, holding));
                    }
                }
            }
            Snapshot::Simple(balances) => {
                for (asset, holding) in balances {
                    rows.push(HoldingRow::new("", asset, holding));
                }
            }
            Snapshot::Blockchain(balances) => {
                for (chain, addresses) in balances {
                    for (address, balances) in addresses {
                        let location = format!("{chain}/{address}");
                        for (asset, holding) in &balances.assets {
                            rows.push(HoldingRow::new(&location, asset, holding));
                        }
                        for (asset, holding) in &balances.liabilities {
                            let mut row = HoldingRow::new(&location, asset, holding);
                            row.liability = true;
                            rows.push(row);
                        }
                    }
                }
            }
            Snapshot::Account(balances) => {
                for (address, assets) in balances {
                    for (asset, holding) in assets {
                        rows.push(HoldingRow::new(address, asset, holding));
                    }
                }
            }
            Snapshot::Utxo(balances) => {
                for (chain, balance) in balances {
                    for (address, holding) in &balance.standalone {
                        rows.push(HoldingRow::new(address, chain.as_str(), holding));
                    }
                    for xpub in balance.xpubs.iter().flatten() {
                        for (address, holding) in &xpub.addresses {
                            let location = match &xpub.xpub {
                                Some(key) => format!("{key}/{address}"),
                                None => address.clone(),
                            };
                            rows.push(HoldingRow::new(location, chain.as_str(), holding));
                        }
                    }
                }
            }
        }
        rows
    }

    /// Sum of USD value over all non-liability holdings.
    pub fn total_usd_value(&self) -> Decimal {
        self.holdings()
            .iter()
            .filter(|row| !row.liability)
            .map(|row| row.holding.usd_value)
            .sum()
    }

    /// Sum of USD value over all liabilities.
    pub fn total_liabilities(&self) -> Decimal {
        self.holdings()
            .iter()
            .filter(|row| row.liability)
            .map(|row| row.holding.usd_value)
            .sum()
    }
}
