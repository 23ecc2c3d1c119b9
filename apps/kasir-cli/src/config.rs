//! Kasir configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                | Default      | Meaning                           |
//! |-------------------------|--------------|-----------------------------------|
//! | `KASIR_DATABASE_PATH`   | `./kasir.db` | SQLite file (`:memory:` allowed)  |
//! | `KASIR_MAX_CONNECTIONS` | `5`          | Pool size                         |
//! | `KASIR_UTC_OFFSET`      | `+00:00`     | Offset for calendar days          |

use std::env;
use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};
use kasir_core::DateParser;
use kasir_db::DbConfig;
use serde::Serialize;

pub const DATABASE_PATH_VAR: &str = "KASIR_DATABASE_PATH";
pub const MAX_CONNECTIONS_VAR: &str = "KASIR_MAX_CONNECTIONS";
pub const UTC_OFFSET_VAR: &str = "KASIR_UTC_OFFSET";

/// Kasir configuration.
#[derive(Debug, Clone, Serialize)]
pub struct KasirConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Maximum pooled connections
    pub max_connections: u32,

    /// Offset that daily reports and offset-less dates are read in
    #[serde(serialize_with = "serialize_offset")]
    pub utc_offset: FixedOffset,
}

impl KasirConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections: u32 = lookup(MAX_CONNECTIONS_VAR)
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue(MAX_CONNECTIONS_VAR.to_string()))?;

        if max_connections == 0 {
            return Err(ConfigError::InvalidValue(MAX_CONNECTIONS_VAR.to_string()));
        }

        let utc_offset = match lookup(UTC_OFFSET_VAR) {
            Some(raw) => parse_utc_offset(&raw)
                .ok_or_else(|| ConfigError::InvalidValue(UTC_OFFSET_VAR.to_string()))?,
            None => Utc.fix(),
        };

        Ok(KasirConfig {
            database_path: lookup(DATABASE_PATH_VAR)
                .filter(|path| !path.is_empty())
                .unwrap_or_else(|| "./kasir.db".to_string())
                .into(),
            max_connections,
            utc_offset,
        })
    }

    /// Pool configuration for this config.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path.as_os_str() == kasir_db::pool::IN_MEMORY_PATH {
            return DbConfig::in_memory();
        }

        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }

    /// Date parser reading days in the configured offset.
    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.utc_offset)
    }
}

/// Parses `+07:00`, `-05:30`, `Z` or `UTC`.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(Utc.fix());
    }

    raw.parse::<FixedOffset>().ok()
}

fn serialize_offset<S: serde::Serializer>(
    offset: &FixedOffset,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(offset)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<KasirConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        KasirConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from("./kasir.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.utc_offset, Utc.fix());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (DATABASE_PATH_VAR, "/var/lib/kasir/toko.db"),
            (MAX_CONNECTIONS_VAR, "8"),
            (UTC_OFFSET_VAR, "+07:00"),
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/kasir/toko.db"));
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.utc_offset.local_minus_utc(), 7 * 3600);
        assert_eq!(config.db_config().max_connections, 8);
        assert_eq!(config.date_parser().offset(), config.utc_offset);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            (MAX_CONNECTIONS_VAR, "lots"),
            (MAX_CONNECTIONS_VAR, "0"),
            (UTC_OFFSET_VAR, "Asia/Jakarta"),
            (UTC_OFFSET_VAR, "+25:00"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid value for {}", key));
        }
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("Z"), Some(Utc.fix()));
        assert_eq!(parse_utc_offset("utc"), Some(Utc.fix()));
        assert_eq!(
            parse_utc_offset("-05:30").map(|o| o.local_minus_utc()),
            Some(-(5 * 3600 + 30 * 60))
        );
        assert_eq!(parse_utc_offset(""), None);
    }

    #[test]
    fn test_in_memory_path() {
        let config = load(&[(DATABASE_PATH_VAR, ":memory:")]).unwrap();
        assert!(config.db_config().is_in_memory());
    }
}
