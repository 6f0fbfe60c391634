//! TOML configuration for `maglevctl`.

use std::path::Path;

use anyhow::Context;
use maglev_table::{Maglev, MaglevError, TableOptions};
use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Backend set and table shape.
    pub table: TableSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[table]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TableSection {
    /// Backend names.
    pub backends: Vec<String>,
    /// Requested partition count. Rounded up to a prime.
    pub partitions: u64,
    /// Backends to mark dead after construction.
    pub dead: Vec<String>,
    /// Hash and permutation options.
    #[serde(flatten)]
    pub options: TableOptions,
}

impl Default for TableSection {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            partitions: maglev_table::SMALL_M.get(),
            dead: Vec::new(),
            options: TableOptions::default(),
        }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("reading {}", p.display()))?;
                let config: CliConfig = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", p.display()))?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Build the configured table, with the configured dead set applied.
    pub fn build(&self) -> Result<Maglev, MaglevError> {
        let mut table = Maglev::new(
            &self.table.backends,
            self.table.partitions,
            self.table.options.clone(),
        )?;
        if !self.table.dead.is_empty() {
            table.remove(&self.table.dead)?;
        }
        Ok(table)
    }
}
