use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn default_precision() -> u32 {
    2
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            format: OutputFormat::Table,
            precision: default_precision(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Price table used when none is given on the command line
    pub prices_path: Option<String>,
    #[serde(default)]
    pub display: DisplayConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    /// Loads the default config, or falls back to defaults if it does not exist.
    pub fn load_or_default() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path_or_default(&config_path)
    }

    pub fn load_from_path_or_default<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "balval", "balval")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "balval", "balval")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Resolves the price table path from the command line or config.
    ///
    /// Relative `prices_path` entries are resolved against the data directory.
    pub fn resolve_prices_path(&self, cli_path: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = cli_path {
            return Ok(PathBuf::from(path));
        }
        let configured = self
            .prices_path
            .as_deref()
            .context("No price table given: pass --prices or set prices_path in config")?;
        let path = PathBuf::from(configured);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(self.default_data_path()?.join(path))
        }
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
prices_path: "/var/lib/balval/prices.json"
display:
  format: json
  precision: 4
data_path: "/tmp/balval"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.prices_path.as_deref(),
            Some("/var/lib/balval/prices.json")
        );
        assert_eq!(config.display.format, OutputFormat::Json);
        assert_eq!(config.display.precision, 4);
        assert_eq!(config.data_path.as_deref(), Some("/tmp/balval"));
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("prices_path: prices.json\n")
            .expect("Failed to deserialize");
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.display.precision, 2);
        assert!(config.data_path.is_none());

        let config: AppConfig =
            serde_yaml::from_str("display:\n  format: table\n").expect("Failed to deserialize");
        assert_eq!(config.display.precision, 2);
    }

    #[test]
    fn test_resolve_prices_path() -> Result<()> {
        let config = AppConfig {
            prices_path: Some("prices.json".to_string()),
            display: DisplayConfig::default(),
            data_path: Some("/data".to_string()),
        };
        assert_eq!(
            config.resolve_prices_path(Some("/tmp/p.json"))?,
            PathBuf::from("/tmp/p.json")
        );
        assert_eq!(
            config.resolve_prices_path(None)?,
            PathBuf::from("/data/prices.json")
        );

        let config = AppConfig::default();
        assert!(config.resolve_prices_path(None).is_err());
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/balval/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_load_from_path_or_default() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let config_path = temp_dir.path().join("config.yaml");

        let config = AppConfig::load_from_path_or_default(&config_path)?;
        assert!(config.prices_path.is_none());
        assert_eq!(config.display, DisplayConfig::default());

        fs::write(&config_path, "prices_path: p.json\ndisplay:\n  format: json\n")?;
        let config = AppConfig::load_from_path_or_default(&config_path)?;
        assert_eq!(config.prices_path.as_deref(), Some("p.json"));
        assert_eq!(config.display.format, OutputFormat::Json);

        // An existing but malformed file is still an error
        fs::write(&config_path, "display: [")?;
        assert!(AppConfig::load_from_path_or_default(&config_path).is_err());
        Ok(())
    }
}
