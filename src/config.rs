//! Configuration file for report-bridge.
//!
//! ```toml
//! [universes]
//! product_prefix = "ReportServer"
//! test_prefix = "Harness.Proxies."
//! target_namespace = "ReportServer"
//! unresolved = "null"   # or "error"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use crate::UniverseOpts;
use anyhow::Context;
use mirror_convert::ConverterConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Read from the `[universes]` table
    #[serde(default, rename = "universes")]
    pub converter: ConverterConfig,
}

impl BridgeConfig {
    /// Load and validate a TOML configuration file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise start from defaults; then apply
    /// command-line overrides.
    pub fn resolve(path: Option<&Path>, opts: &UniverseOpts) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(opts);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, opts: &UniverseOpts) {
        let universes = &mut self.converter.universes;
        if let Some(prefix) = &opts.product_prefix {
            universes.product_prefix = prefix.clone();
        }
        if let Some(prefix) = &opts.test_prefix {
            universes.test_prefix = prefix.clone();
        }
        if let Some(namespace) = &opts.target_namespace {
            universes.target_namespace = namespace.clone();
        }
        if let Some(policy) = opts.unresolved {
            self.converter.unresolved = policy;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let universes = &self.converter.universes;
        if universes.product_prefix.trim().is_empty() {
            anyhow::bail!("product_prefix must not be empty");
        }
        if universes.test_prefix.trim().is_empty() {
            anyhow::bail!("test_prefix must not be empty");
        }
        if universes.target_namespace.trim().is_empty() {
            anyhow::bail!("target_namespace must not be empty");
        }
        if universes.product_prefix.starts_with(&universes.test_prefix)
            || universes.test_prefix.starts_with(&universes.product_prefix)
        {
            anyhow::bail!(
                "product_prefix '{}' and test_prefix '{}' overlap",
                universes.product_prefix,
                universes.test_prefix
            );
        }
        Ok(())
    }
}
