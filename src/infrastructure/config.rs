//! Application configuration

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::domain::value_objects::Language;

/// Prefix of every environment variable read into [`AppConfig`]
pub const ENV_PREFIX: &str = "KINDRED";

/// Application configuration loaded from environment
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory whose definition files replace the embedded catalogs
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
    /// Default display language for names
    pub language: Language,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl AppConfig {
    /// Load configuration from `KINDRED_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from an explicit variable map instead of the process environment
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(environment: Environment) -> Result<Self> {
        Config::builder()
            .set_default("language", Language::FALLBACK.tag())?
            .set_default("log_filter", "kindred_sheet=info")?
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_vars(HashMap::new()).unwrap();
        assert_eq!(config.language, Language::English);
        assert_eq!(config.log_filter, "kindred_sheet=info");
        assert!(config.catalog_dir.is_none());
    }

    #[test]
    fn test_prefixed_variables_override_defaults() {
        let config = AppConfig::from_vars(vars(&[
            ("KINDRED_LANGUAGE", "de"),
            ("KINDRED_CATALOG_DIR", "/srv/catalogs"),
            ("KINDRED_LOG_FILTER", "kindred_sheet=debug"),
            ("LANGUAGE", "en"),
        ]))
        .unwrap();
        assert_eq!(config.language, Language::German);
        assert_eq!(config.catalog_dir, Some(PathBuf::from("/srv/catalogs")));
        assert_eq!(config.log_filter, "kindred_sheet=debug");
    }

    #[test]
    fn test_unsupported_language_is_rejected() {
        assert!(AppConfig::from_vars(vars(&[("KINDRED_LANGUAGE", "fr")])).is_err());
    }
}
