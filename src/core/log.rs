//! Tracing setup for the `balval` binary

use anyhow::{Result, anyhow};
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

const CRATE_TARGET: &str = "balval";

/// Filter directives: crate logs at `debug` when verbose, warnings otherwise.
///
/// `RUST_LOG` replaces these defaults entirely when set.
fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "warn" };
    format!("off,{CRATE_TARGET}={level}")
}

fn build_filter(verbose: bool, env: Option<&str>) -> Result<EnvFilter> {
    let directives = match env {
        Some(env) if !env.trim().is_empty() => env.to_string(),
        _ => default_directives(verbose),
    };
    EnvFilter::try_new(&directives).map_err(|e| anyhow!("Invalid log filter '{directives}': {e}"))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(verbose: bool) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbose, env.as_deref())?;

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(true), "off,balval=debug");
        assert_eq!(default_directives(false), "off,balval=warn");
    }

    #[test]
    fn test_build_filter_prefers_env() -> Result<()> {
        let filter = build_filter(false, Some("balval::core=trace"))?;
        assert_eq!(filter.to_string(), "balval::core=trace");

        let filter = build_filter(true, Some("  "))?;
        assert!(filter.to_string().contains("balval=debug"));
        Ok(())
    }

    #[test]
    fn test_build_filter_rejects_invalid_directives() {
        let result = build_filter(false, Some("balval=notalevel"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log filter"));
    }
}
