//! Balance snapshot and price table types

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::str::FromStr;

/// An amount of an asset plus its derived USD value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub amount: Decimal,
    #[serde(default)]
    pub usd_value: Decimal,
}

impl Holding {
    pub fn new(amount: Decimal, usd_value: Decimal) -> Self {
        Self { amount, usd_value }
    }
}

/// Latest known price of a single asset.
///
/// `usd_price` takes precedence over `value` when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    #[serde(default)]
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd_price: Option<Decimal>,
}

impl PriceEntry {
    pub fn new(value: Decimal) -> Self {
        Self {
            value,
            usd_price: None,
        }
    }

    pub fn with_usd_price(value: Decimal, usd_price: Decimal) -> Self {
        Self {
            value,
            usd_price: Some(usd_price),
        }
    }

    /// Price used for valuation: `usd_price`, falling back to `value`.
    pub fn effective_price(&self) -> Decimal {
        self.usd_price.unwrap_or(self.value)
    }
}

/// Current price quotes keyed by asset (or chain) identifier.
pub type AssetPrices = HashMap<String, PriceEntry>;

/// Flat asset -> holding mapping.
pub type AssetBalances = BTreeMap<String, Holding>;

/// Per-chain mapping of asset -> holding.
pub type Totals = BTreeMap<String, AssetBalances>;

/// Address -> asset -> holding mapping.
pub type AccountAssetBalances = BTreeMap<String, AssetBalances>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBalances {
    #[serde(default)]
    pub assets: AssetBalances,
    #[serde(default)]
    pub liabilities: AssetBalances,
}

/// Address -> assets/liabilities for one chain.
pub type BlockchainAssetBalances = BTreeMap<String, AddressBalances>;

/// Per-chain mapping of address -> assets/liabilities.
pub type BlockchainBalances = BTreeMap<String, BlockchainAssetBalances>;

/// Chains whose balances are tracked per address and per extended key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum UtxoChain {
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "BCH")]
    Bch,
}

impl UtxoChain {
    /// Identifier used for price lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            UtxoChain::Btc => "BTC",
            UtxoChain::Bch => "BCH",
        }
    }
}

impl Display for UtxoChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UtxoChain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BTC" => Ok(UtxoChain::Btc),
            "BCH" => Ok(UtxoChain::Bch),
            _ => Err(anyhow::anyhow!("Invalid UTXO chain: {}", s)),
        }
    }
}

/// Addresses derived from one extended public key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpubBalance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation_path: Option<String>,
    #[serde(default)]
    pub addresses: BTreeMap<String, Holding>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoBalance {
    #[serde(default)]
    pub standalone: BTreeMap<String, Holding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpubs: Option<Vec<XpubBalance>>,
}

pub type UtxoBalances = BTreeMap<UtxoChain, UtxoBalance>;
