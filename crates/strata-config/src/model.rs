use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_common::{Error, Result};

pub const DEFAULT_DATABASE_PATH: &str = "database.sqlite";
pub const DEFAULT_LEDGER_PATH: &str = "migrations.json";

/// Top-level configuration for a Strata run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub migrations: MigrationsConfig,
}

/// Backend kinds with a built-in provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub name: String,
    pub path: PathBuf,
    pub provider: ProviderKind,
    pub connection: ConnectionParams,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DATABASE_PATH.to_string(),
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            provider: ProviderKind::Sqlite,
            connection: ConnectionParams::default(),
        }
    }
}

/// Network parameters for server backends. The SQLite provider ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionParams {
    pub user: String,
    pub host: String,
    pub database: String,
    pub password: String,
    pub port: u16,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            user: "localhost".to_string(),
            host: "localhost".to_string(),
            database: "database.db".to_string(),
            password: String::new(),
            port: 5432,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationsConfig {
    /// JSON file holding the names of applied migrations.
    pub ledger_path: PathBuf,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
        }
    }
}

/// True for SQLite paths that name an in-memory database (`:memory:`,
/// `file::memory:` or a URI with `mode=memory`).
pub fn is_in_memory_path(path: &Path) -> bool {
    let path = path.to_string_lossy();
    path == ":memory:"
        || (path.starts_with("file:") && (path.contains(":memory:") || path.contains("mode=memory")))
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(Error::Config("database.path cannot be empty".into()));
        }
        if is_in_memory_path(&self.database.path) {
            return Err(Error::Config(format!(
                "database.path must be a file, got {}",
                self.database.path.display()
            )));
        }
        if self.migrations.ledger_path.as_os_str().is_empty() {
            return Err(Error::Config("migrations.ledger_path cannot be empty".into()));
        }
        if self.database.connection.port == 0 {
            return Err(Error::Config("database.connection.port cannot be 0".into()));
        }
        Ok(())
    }
}
