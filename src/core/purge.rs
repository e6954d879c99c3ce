//! Manual invalidation of cached session state

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Category of cached state that can be purged on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purgeable {
    CentralizedExchanges,
    DecentralizedExchanges,
    DefiModules,
    Transactions,
}

impl Purgeable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purgeable::CentralizedExchanges => "centralized_exchanges",
            Purgeable::DecentralizedExchanges => "decentralized_exchanges",
            Purgeable::DefiModules => "defi_modules",
            Purgeable::Transactions => "transactions",
        }
    }
}

impl Display for Purgeable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Purgeable {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "centralized_exchanges" => Ok(Purgeable::CentralizedExchanges),
            "decentralized_exchanges" => Ok(Purgeable::DecentralizedExchanges),
            "defi_modules" => Ok(Purgeable::DefiModules),
            "transactions" => Ok(Purgeable::Transactions),
            _ => Err(anyhow::anyhow!("Invalid purgeable: {}", s)),
        }
    }
}

/// Sections whose loading status is tracked per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Trades,
    AssetMovement,
    HistoryEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    RefreshGeneralCache,
}

/// Session state affected by a purge. Implemented by the caller's state holder.
pub trait PurgeTarget: Send {
    fn reset_status(&mut self, section: Section);
    fn reset_state(&mut self, module: &str);
    fn reset_protocol_cache_updates_status(&mut self);
}

/// Resets the state associated with `purgeable`.
///
/// `value` optionally narrows the purge to one exchange or module.
pub fn purge_cache(target: &mut dyn PurgeTarget, purgeable: Purgeable, value: Option<&str>) {
    let value = value.filter(|v| !v.is_empty());
    debug!("Purging {purgeable} (scope: {value:?})");
    match purgeable {
        Purgeable::CentralizedExchanges => {
            if value.is_none() {
                target.reset_status(Section::Trades);
                target.reset_status(Section::AssetMovement);
            }
        }
        Purgeable::DecentralizedExchanges | Purgeable::DefiModules => {
            target.reset_state(value.unwrap_or(purgeable.as_str()));
        }
        Purgeable::Transactions => target.reset_status(Section::HistoryEvent),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task was cancelled")]
    Cancelled,
    #[error("{0}")]
    Failed(String),
}

/// Submits background tasks and waits for their outcome.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn submit(&self, task_type: TaskType) -> Result<u64>;
    async fn await_task(&self, task_id: u64, task_type: TaskType, title: &str)
    -> Result<(), TaskError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub display: bool,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

const REFRESH_GENERAL_CACHE_TITLE: &str = "Refresh general cache";

/// Refreshes the backend's general cache and reports failures.
///
/// Cancellation is silent. Only a failure to submit the task is returned.
pub async fn refresh_general_cache(
    target: &mut dyn PurgeTarget,
    tasks: &dyn TaskRunner,
    notifier: &dyn Notifier,
) -> Result<()> {
    target.reset_protocol_cache_updates_status();
    let task_type = TaskType::RefreshGeneralCache;
    let task_id = tasks.submit(task_type).await?;
    info!(task_id, "Refreshing general cache");

    match tasks
        .await_task(task_id, task_type, REFRESH_GENERAL_CACHE_TITLE)
        .await
    {
        Ok(()) => debug!(task_id, "General cache refreshed"),
        Err(TaskError::Cancelled) => debug!(task_id, "General cache refresh cancelled"),
        Err(e) => {
            warn!(task_id, error = %e, "General cache refresh failed");
            notifier.notify(Notification {
                title: REFRESH_GENERAL_CACHE_TITLE.to_string(),
                message: format!("Failed to refresh the general cache: {e}"),
                display: true,
            });
        }
    }
    Ok(())
}
