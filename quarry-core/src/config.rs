//! Rendering configuration

use serde::{Deserialize, Serialize};

use crate::Result;

/// SQL dialect selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    MySql,
    Postgres,
    Sqlite,
}

/// Settings shared by every statement rendered for one database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Prepended to every logical table name
    pub table_prefix: String,
    pub dialect: DialectKind,
}

impl DatabaseConfig {
    pub fn new(table_prefix: impl Into<String>, dialect: DialectKind) -> Self {
        Self {
            table_prefix: table_prefix.into(),
            dialect,
        }
    }

    /// Parse a JSON document; missing keys take their defaults
    ///
    /// # Examples
    /// ```
    /// use quarry_core::{DatabaseConfig, DialectKind};
    ///
    /// let config = DatabaseConfig::from_json(r#"{"table_prefix": "t_"}"#).unwrap();
    /// assert_eq!(config.table_prefix, "t_");
    /// assert_eq!(config.dialect, DialectKind::MySql);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.table_prefix, "");
        assert_eq!(config.dialect, DialectKind::MySql);
    }

    #[test]
    fn test_from_json() {
        let config =
            DatabaseConfig::from_json(r#"{"table_prefix": "app_", "dialect": "postgres"}"#).unwrap();
        assert_eq!(config, DatabaseConfig::new("app_", DialectKind::Postgres));
    }

    #[test]
    fn test_from_json_rejects_unknown_dialect() {
        let err = DatabaseConfig::from_json(r#"{"dialect": "oracle"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_round_trip_names() {
        let json = serde_json::to_string(&DatabaseConfig::new("", DialectKind::Sqlite)).unwrap();
        assert_eq!(json, r#"{"table_prefix":"","dialect":"sqlite"}"#);
    }
}
