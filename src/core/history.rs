//! Asset movement history records (exchange deposits and withdrawals)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementCategory {
    Deposit,
    Withdrawal,
}

impl Display for MovementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MovementCategory::Deposit => "deposit",
                MovementCategory::Withdrawal => "withdrawal",
            }
        )
    }
}

impl FromStr for MovementCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deposit" => Ok(MovementCategory::Deposit),
            "withdrawal" => Ok(MovementCategory::Withdrawal),
            _ => Err(anyhow::anyhow!("Invalid movement category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMovement {
    pub identifier: String,
    pub location: String,
    pub category: MovementCategory,
    pub address: Option<String>,
    pub transaction_id: Option<String>,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    pub asset: String,
    pub amount: Decimal,
    pub fee_asset: String,
    pub fee: Decimal,
    pub link: String,
}

impl AssetMovement {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_in_accounting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customized: Option<bool>,
}

/// A movement together with its bookkeeping metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMovementEntry {
    pub entry: AssetMovement,
    #[serde(flatten)]
    pub meta: EntryMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMovementCollectionResponse {
    pub entries: Vec<AssetMovementEntry>,
    pub entries_found: u64,
    pub entries_limit: i64,
    pub entries_total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_usd_value: Option<Decimal>,
}

/// Paginated, filtered query for asset movements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMovementRequestPayload {
    pub limit: u64,
    pub offset: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by_attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ascending: Vec<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<MovementCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_ignored_assets: Option<bool>,
}

impl AssetMovementRequestPayload {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit,
            offset,
            ..Default::default()
        }
    }
}

impl AssetMovementCollectionResponse {
    /// Movements in the given category, in response order.
    pub fn by_category(&self, category: MovementCategory) -> Vec<&AssetMovement> {
        self.entries
            .iter()
            .map(|e| &e.entry)
            .filter(|m| m.category == category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const RESPONSE: &str = r#"{
        "entries": [
            {
                "entry": {
                    "identifier": "1",
                    "location": "kraken",
                    "category": "deposit",
                    "address": null,
                    "transactionId": "0xabc",
                    "timestamp": 1609459200,
                    "asset": "ETH",
                    "amount": "1.5",
                    "feeAsset": "ETH",
                    "fee": "0.001",
                    "link": ""
                },
                "ignoredInAccounting": false
            },
            {
                "entry": {
                    "identifier": "2",
                    "location": "binance",
                    "category": "withdrawal",
                    "address": "0xdef",
                    "transactionId": null,
                    "timestamp": 1609545600,
                    "asset": "BTC",
                    "amount": 2,
                    "feeAsset": "BTC",
                    "fee": "0",
                    "link": "https://example.com/tx"
                }
            }
        ],
        "entriesFound": 2,
        "entriesLimit": -1,
        "entriesTotal": 2,
        "totalUsdValue": "1234.5"
    }"#;

    #[test]
    fn test_collection_response_deserialization() {
        let response: AssetMovementCollectionResponse =
            serde_json::from_str(RESPONSE).expect("Failed to deserialize");

        assert_eq!(response.entries.len(), 2);
        let first = &response.entries[0];
        assert_eq!(first.entry.category, MovementCategory::Deposit);
        assert_eq!(first.entry.amount, dec!(1.5));
        assert_eq!(first.entry.transaction_id.as_deref(), Some("0xabc"));
        assert!(first.entry.address.is_none());
        assert_eq!(first.meta.ignored_in_accounting, Some(false));

        let second = &response.entries[1];
        assert_eq!(second.entry.amount, dec!(2));
        assert_eq!(second.meta, EntryMeta::default());

        assert_eq!(response.entries_limit, -1);
        assert_eq!(response.total_usd_value, Some(dec!(1234.5)));
        assert_eq!(response.by_category(MovementCategory::Withdrawal).len(), 1);
    }

    #[test]
    fn test_rejects_unknown_category() {
        let invalid = RESPONSE.replace("\"deposit\"", "\"transfer\"");
        let result: Result<AssetMovementCollectionResponse, _> = serde_json::from_str(&invalid);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_numeric_amount() {
        let invalid = RESPONSE.replace("\"1.5\"", "\"lots\"");
        let result: Result<AssetMovementCollectionResponse, _> = serde_json::from_str(&invalid);
        assert!(result.is_err());
    }

    #[test]
    fn test_datetime_from_timestamp() {
        let response: AssetMovementCollectionResponse = serde_json::from_str(RESPONSE).unwrap();
        let dt = response.entries[0].entry.datetime().unwrap();
        assert_eq!(dt.to_rfc3339(), "2021-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_request_payload_skips_absent_filters() {
        let mut payload = AssetMovementRequestPayload::new(10, 0);
        payload.location = Some("kraken".to_string());
        payload.action = Some(MovementCategory::Withdrawal);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "limit": 10,
                "offset": 0,
                "location": "kraken",
                "action": "withdrawal"
            })
        );
    }

    #[test]
    fn test_movement_category_from_str() {
        assert_eq!(
            "Deposit".parse::<MovementCategory>().unwrap(),
            MovementCategory::Deposit
        );
        assert!("trade".parse::<MovementCategory>().is_err());
    }
}
