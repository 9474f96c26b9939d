//! Rule-table configuration.
//!
//! A rules file is a TOML rendering of [`RuleTable`]. Every field is
//! optional; whatever is missing keeps its built-in value. For example, to
//! raise the new regime's standard deduction:
//!
//! ```toml
//! [new]
//! standard_deduction = 75000
//! ```
//!
//! Rates are fractions, best written as quoted strings (`"0.05"`) so they
//! are read as exact decimals.

use std::path::{Path, PathBuf};

use regime_core::calculations::{RuleTable, RuleTableError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read rules file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rules: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid rules: {0}")]
    Invalid(#[from] RuleTableError),

    #[error("cannot render rules: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Parses and validates a rule table from TOML text.
pub fn parse_rules(text: &str) -> Result<RuleTable, ConfigError> {
    let rules: RuleTable = toml::from_str(text)?;
    rules.validate()?;
    Ok(rules)
}

/// Loads the rule table from `path`, or the built-in table when `None`.
pub fn load_rules(path: Option<&Path>) -> Result<RuleTable, ConfigError> {
    let Some(path) = path else {
        tracing::debug!("using built-in rule table");
        return Ok(RuleTable::default());
    };

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = parse_rules(&text)?;
    tracing::info!(path = %path.display(), "loaded rule table");
    Ok(rules)
}

pub fn render_rules(rules: &RuleTable) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(rules)?)
}
