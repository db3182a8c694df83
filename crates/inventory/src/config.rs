//! Ledger configuration.

/// Env var overriding [`LedgerConfig::parent_delimiter`].
pub const PARENT_DELIMITER_VAR: &str = "PARTUNIVERSE_PARENT_DELIMITER";
/// Env var overriding [`LedgerConfig::recent_transactions_limit`].
pub const RECENT_TRANSACTIONS_VAR: &str = "PARTUNIVERSE_RECENT_TRANSACTIONS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Separator between names in qualified storage place / category names.
    pub parent_delimiter: String,
    /// How many transactions "most recent" listings return.
    pub recent_transactions_limit: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            parent_delimiter: " > ".to_string(),
            recent_transactions_limit: 5,
        }
    }
}

impl LedgerConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns; unusable values are
    /// logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(delimiter) = lookup(PARENT_DELIMITER_VAR) {
            if delimiter.is_empty() {
                tracing::warn!("{PARENT_DELIMITER_VAR} is empty; using default");
            } else {
                config.parent_delimiter = delimiter;
            }
        }

        if let Some(raw) = lookup(RECENT_TRANSACTIONS_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => config.recent_transactions_limit = limit,
                _ => tracing::warn!(
                    value = %raw,
                    "{RECENT_TRANSACTIONS_VAR} must be a positive integer; using default"
                ),
            }
        }

        config
    }
}
