//! Configuration schema (schemabind.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Database connection settings.
///
/// The password is read from the `password` key or, when absent, from
/// the `PGPASSWORD` environment variable (loaded via dotenv by the
/// CLI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            user: "postgres".to_string(),
            password: None,
        }
    }
}

impl ConnectionConfig {
    /// Resolve the password from config or environment.
    pub fn password(&self) -> Option<String> {
        self.password
            .clone()
            .or_else(|| std::env::var("PGPASSWORD").ok())
    }

    /// Build a libpq-style connection string.
    pub fn connection_string(&self) -> String {
        let mut conn = format!(
            "host={} port={} dbname={} user={}",
            self.host, self.port, self.database, self.user
        );
        if let Some(password) = self.password() {
            conn.push_str(&format!(" password={}", password));
        }
        conn
    }
}

/// Names excluded from description and generation passes.
///
/// Skipping filters derived output only; the canonical graph is never
/// mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipLists {
    /// Enum and composite type names to exclude.
    pub types: Vec<String>,

    /// Function names to exclude.
    pub functions: Vec<String>,

    /// Table names to exclude.
    pub tables: Vec<String>,

    /// Per-table column names to exclude.
    pub columns: HashMap<String, Vec<String>>,
}

impl SkipLists {
    pub fn skips_type(&self, name: &str) -> bool {
        self.types.iter().any(|t| t == name)
    }

    pub fn skips_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f == name)
    }

    pub fn skips_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t == name)
    }

    pub fn skips_column(&self, table: &str, column: &str) -> bool {
        self.columns
            .get(table)
            .map(|cols| cols.iter().any(|c| c == column))
            .unwrap_or(false)
    }
}

/// Literal identifier overrides per entity kind.
///
/// An exact-match entry replaces the resolved identifier entirely,
/// bypassing both the per-kind strategy and the default pascal-case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameRules {
    pub enums: HashMap<String, String>,
    pub types: HashMap<String, String>,
    pub tables: HashMap<String, String>,
    pub columns: HashMap<String, String>,
    pub functions: HashMap<String, String>,
}

/// Literal fragment overrides per entity kind.
///
/// An exact-match entry replaces the emitted text for that entity,
/// bypassing the configured builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaceRules {
    pub enums: HashMap<String, String>,
    pub types: HashMap<String, String>,
    pub tables: HashMap<String, String>,
    pub columns: HashMap<String, String>,
    pub functions: HashMap<String, String>,
}

/// Top-level configuration (schemabind.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schemas to introspect; one graph is built per name.
    pub schemas: Vec<String>,

    pub connection: ConnectionConfig,

    pub skip: SkipLists,

    pub rename: RenameRules,

    pub replace: ReplaceRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schemas: vec!["public".to_string()],
            connection: ConnectionConfig::default(),
            skip: SkipLists::default(),
            rename: RenameRules::default(),
            replace: ReplaceRules::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_public() {
        let config = Config::default();
        assert_eq!(config.schemas, vec!["public"]);
        assert_eq!(config.connection.port, 5432);
    }

    #[test]
    fn parse_full_config() {
        let config = Config::from_toml_str(
            r#"
schemas = ["public", "audit"]

[connection]
host = "db.internal"
port = 5433
database = "app"
user = "reader"

[skip]
types = ["role_type"]
tables = ["migrations"]

[skip.columns]
user = ["password_hash"]

[rename.enums]
role_type = "Role"

[replace.tables]
legacy = "export type Legacy = unknown;"
"#,
        )
        .unwrap();

        assert_eq!(config.schemas, vec!["public", "audit"]);
        assert_eq!(config.connection.host, "db.internal");
        assert!(config.skip.skips_type("role_type"));
        assert!(config.skip.skips_table("migrations"));
        assert!(config.skip.skips_column("user", "password_hash"));
        assert!(!config.skip.skips_column("user", "id"));
        assert_eq!(config.rename.enums["role_type"], "Role");
        assert!(config.replace.tables.contains_key("legacy"));
    }

    #[test]
    fn connection_string_omits_missing_password() {
        let conn = ConnectionConfig::default();
        // Only assert the stable prefix; PGPASSWORD may be set in the
        // environment running the tests.
        assert!(conn
            .connection_string()
            .starts_with("host=localhost port=5432 dbname=postgres user=postgres"));
    }
}
