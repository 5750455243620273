use std::path::Path;

use strata_common::{Error, Result};
use tracing::info;

use crate::model::AppConfig;

/// Reads an [`AppConfig`] from disk.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate the config at `path`. A missing file is not an
    /// error: the defaults are returned instead.
    pub fn load(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            info!(
                "config file not found at {}, applying default config",
                path.display()
            );
            return Ok(AppConfig::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::parse(path, &contents)?;
        config.validate()?;

        info!("config loaded from {}", path.display());
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<AppConfig> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yml" | "yaml" => serde_yaml::from_str(contents)
                .map_err(|e| Error::Config(format!("YAML parse error: {e}"))),
            "toml" => toml::from_str(contents)
                .map_err(|e| Error::Config(format!("TOML parse error: {e}"))),
            "json" => serde_json::from_str(contents)
                .map_err(|e| Error::Config(format!("JSON parse error: {e}"))),
            other => Err(Error::Config(format!(
                "unsupported config extension: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load(&dir.path().join("database.yml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn yaml_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.yml");
        std::fs::write(
            &path,
            "database:\n  path: app.sqlite\nmigrations:\n  ledger_path: state/ledger.json\n",
        )
        .unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.database.path, PathBuf::from("app.sqlite"));
        assert_eq!(config.database.name, "database.sqlite");
        assert_eq!(
            config.migrations.ledger_path,
            PathBuf::from("state/ledger.json")
        );
    }

    #[test]
    fn toml_is_supported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.toml");
        std::fs::write(
            &path,
            "[database]\nprovider = \"sqlite\"\npath = \"other.sqlite\"\n\n[database.connection]\nport = 6543\n",
        )
        .unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.database.path, PathBuf::from("other.sqlite"));
        assert_eq!(config.database.connection.port, 6543);
        assert_eq!(config.database.connection.user, "localhost");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.ini");
        std::fs::write(&path, "path=x").unwrap();

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config extension: ini"));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, r#"{"database": {"connection": {"port": 0}}}"#).unwrap();

        assert!(matches!(ConfigLoader::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn unknown_provider_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.yml");
        std::fs::write(&path, "database:\n  provider: oracle\n").unwrap();

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("YAML parse error"));
    }
}
