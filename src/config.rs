//! Runtime settings read from environment variables.

use crate::decode::OutputEncoding;
use anyhow::{Result, anyhow};

/// Tracing filter directive, e.g. `command_template=debug`.
pub const LOG_VAR: &str = "COMMAND_TEMPLATE_LOG";
/// Encoding label used to decode captured output.
pub const ENCODING_VAR: &str = "COMMAND_TEMPLATE_ENCODING";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_filter: String,
    pub encoding: OutputEncoding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            encoding: OutputEncoding::platform_default(),
        }
    }
}

impl Config {
    /// Reads the process environment, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(filter) = lookup(LOG_VAR).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }
        if let Some(label) = lookup(ENCODING_VAR) {
            config.set_encoding(&label)?;
        }

        Ok(config)
    }

    /// Overrides the output encoding by label.
    pub fn set_encoding(&mut self, label: &str) -> Result<()> {
        self.encoding = OutputEncoding::from_label(label)
            .ok_or_else(|| anyhow!("unknown output encoding: {label}"))?;
        Ok(())
    }
}
