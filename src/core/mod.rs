//! Core balance valuation logic and session plumbing

pub mod balance;
pub mod config;
pub mod history;
pub mod log;
pub mod prices;
pub mod purge;
pub mod snapshot;

// Re-export main types for cleaner imports
pub use balance::{AssetPrices, Holding, PriceEntry};
pub use snapshot::{Snapshot, SnapshotKind};
