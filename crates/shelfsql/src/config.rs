//! Generator configuration.

use serde::{Deserialize, Serialize};

/// Target SQL dialect. Only the identifier quote character differs; every
/// dialect uses positional `?` placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    /// MySQL / MariaDB: `` `name` ``
    #[default]
    #[serde(rename = "mysql")]
    MySql,
    /// Standard SQL (SQLite, DuckDB, ...): `"name"`
    #[serde(rename = "ansi")]
    Ansi,
}

impl Dialect {
    pub fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Ansi => '"',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Ansi => "ansi",
        }
    }

    /// Parse a dialect name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Dialect::MySql),
            "ansi" | "sqlite" | "standard" => Some(Dialect::Ansi),
            _ => None,
        }
    }
}

/// Settings shared by the WHERE compiler and every statement builder.
///
/// # Example
/// ```
/// use shelfsql::{Dialect, GeneratorConfig};
///
/// let config = GeneratorConfig::new()
///     .dialect(Dialect::Ansi)
///     .count_alias("total")
///     .max_depth(16);
/// assert_eq!(config.dialect, Dialect::Ansi);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Identifier quoting style.
    pub dialect: Dialect,
    /// Alias of the `COUNT(*)` column in count statements.
    pub count_alias: String,
    /// Maximum nesting of AND/OR groups and nested queries.
    pub max_depth: usize,
    /// Truncate logged SQL to this many bytes. `None` disables truncation.
    pub log_sql_max_len: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::MySql,
            count_alias: "count".to_string(),
            max_depth: 64,
            log_sql_max_len: Some(200),
        }
    }
}

impl GeneratorConfig {
    /// Create a config with defaults (MySQL, alias `count`, depth 64).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn count_alias(mut self, alias: impl Into<String>) -> Self {
        self.count_alias = alias.into();
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set maximum SQL length to log.
    pub fn log_sql_max_len(mut self, len: usize) -> Self {
        self.log_sql_max_len = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_log_truncate(mut self) -> Self {
        self.log_sql_max_len = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: GeneratorConfig = serde_json::from_str(r#"{"dialect": "ansi"}"#).unwrap();
        assert_eq!(config.dialect, Dialect::Ansi);
        assert_eq!(config.count_alias, "count");
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<GeneratorConfig>(r#"{"dialekt": "ansi"}"#).is_err());
    }

    #[test]
    fn log_truncation_setters() {
        assert_eq!(GeneratorConfig::new().log_sql_max_len, Some(200));
        assert_eq!(GeneratorConfig::new().log_sql_max_len(50).log_sql_max_len, Some(50));
        assert_eq!(GeneratorConfig::new().no_log_truncate().log_sql_max_len, None);
    }

    #[test]
    fn dialect_names() {
        assert_eq!(Dialect::from_name("MySQL"), Some(Dialect::MySql));
        assert_eq!(Dialect::from_name("sqlite"), Some(Dialect::Ansi));
        assert_eq!(Dialect::from_name("oracle"), None);
    }
}
