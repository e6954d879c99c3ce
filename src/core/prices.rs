//! Merges current prices into balance snapshots.
//!
//! Every operation borrows its input and builds a structurally independent
//! output with the same keys and amounts. Only `usd_value` is recomputed, and
//! only for holdings whose identifier has an entry in the price table.

use crate::core::balance::{
    AccountAssetBalances, AddressBalances, AssetBalances, AssetPrices, BlockchainBalances,
    Holding, PriceEntry, Totals, UtxoBalance, UtxoBalances, XpubBalance,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Rebuilds `holding` with `usd_value = amount * price`, keeping the amount.
pub fn revalue(holding: &Holding, price: &PriceEntry) -> Holding {
    let effective = price.effective_price();
    match holding.amount.checked_mul(effective) {
        Some(usd_value) => Holding::new(holding.amount, usd_value),
        None => {
            warn!(amount = %holding.amount, price = %effective, "USD value overflows, keeping previous value");
            *holding
        }
    }
}

/// Walks one snapshot, counting revalued and skipped holdings.
struct Merger<'a> {
    prices: &'a AssetPrices,
    revalued: usize,
    skipped: usize,
}

impl<'a> Merger<'a> {
    fn new(prices: &'a AssetPrices) -> Self {
        Self {
            prices,
            revalued: 0,
            skipped: 0,
        }
    }

    fn holding(&mut self, identifier: &str, holding: &Holding) -> Holding {
        match self.prices.get(identifier) {
            Some(price) => {
                self.revalued += 1;
                revalue(holding, price)
            }
            None => {
                self.skipped += 1;
                debug!("No price for {identifier}, keeping holding");
                *holding
            }
        }
    }

    fn simple(&mut self, balances: &AssetBalances) -> AssetBalances {
        balances
            .iter()
            .map(|(asset, holding)| (asset.clone(), self.holding(asset, holding)))
            .collect()
    }

    fn addresses(
        &mut self,
        addresses: &BTreeMap<String, Holding>,
        price: &PriceEntry,
    ) -> BTreeMap<String, Holding> {
        self.revalued += addresses.len();
        addresses
            .iter()
            .map(|(address, holding)| (address.clone(), revalue(holding, price)))
            .collect()
    }

    fn utxo(&mut self, balance: &UtxoBalance, price: &PriceEntry) -> UtxoBalance {
        let xpubs = balance.xpubs.as_ref().map(|xpubs| {
            xpubs
                .iter()
                .map(|xpub| XpubBalance {
                    xpub: xpub.xpub.clone(),
                    derivation_path: xpub.derivation_path.clone(),
                    addresses: self.addresses(&xpub.addresses, price),
                })
                .collect()
        });
        UtxoBalance {
            standalone: self.addresses(&balance.standalone, price),
            xpubs,
        }
    }

    fn finish(&self, container: &str) {
        debug!(
            revalued = self.revalued,
            skipped = self.skipped,
            "Merged prices into {container}"
        );
    }
}

/// Revalues a flat asset -> holding mapping.
pub fn merge_simple_balances(balances: &AssetBalances, prices: &AssetPrices) -> AssetBalances {
    let mut merger = Merger::new(prices);
    let merged = merger.simple(balances);
    merger.finish("balances");
    merged
}

/// Revalues per-chain asset totals.
pub fn merge_totals(totals: &Totals, prices: &AssetPrices) -> Totals {
    let mut merger = Merger::new(prices);
    let merged = totals
        .iter()
        .map(|(chain, balances)| (chain.clone(), merger.simple(balances)))
        .collect();
    merger.finish("totals");
    merged
}

/// Revalues both assets and liabilities of every address on every chain.
pub fn merge_blockchain_balances(
    balances: &BlockchainBalances,
    prices: &AssetPrices,
) -> BlockchainBalances {
    let mut merger = Merger::new(prices);
    let merged = balances
        .iter()
        .map(|(chain, addresses)| {
            let addresses = addresses
                .iter()
                .map(|(address, balances)| {
                    let merged = AddressBalances {
                        assets: merger.simple(&balances.assets),
                        liabilities: merger.simple(&balances.liabilities),
                    };
                    (address.clone(), merged)
                })
                .collect();
            (chain.clone(), addresses)
        })
        .collect();
    merger.finish("blockchain balances");
    merged
}

/// Revalues per-address asset balances.
pub fn merge_account_asset_balances(
    balances: &AccountAssetBalances,
    prices: &AssetPrices,
) -> AccountAssetBalances {
    let mut merger = Merger::new(prices);
    let merged = balances
        .iter()
        .map(|(address, assets)| (address.clone(), merger.simple(assets)))
        .collect();
    merger.finish("account balances");
    merged
}

/// Revalues BTC/BCH balances. The price is looked up by chain, not by address.
pub fn merge_utxo_balances(balances: &UtxoBalances, prices: &AssetPrices) -> UtxoBalances {
    let mut merger = Merger::new(prices);
    let mut merged = UtxoBalances::new();
    for (chain, balance) in balances {
        let entry = match prices.get(chain.as_str()) {
            Some(price) => merger.utxo(balance, price),
            None => {
                merger.skipped += 1;
                debug!("No price for {chain}, keeping balances");
                balance.clone()
            }
        };
        merged.insert(*chain, entry);
    }
    merger.finish("UTXO balances");
    merged
}
