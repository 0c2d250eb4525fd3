//! Configuration provider and typed database configuration.
//!
//! `Settings` is a thin TOML-backed key/value view with dotted keys
//! (`database.mysql.host`) and typed accessors that fall back to a default
//! when a key is missing. `DatabaseConfig` is what the store factory
//! actually consumes.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::types::BackendKind;

/// Default SQLite file name, resolved against the data directory.
pub const DEFAULT_SQLITE_PATH: &str = "artificialintelligence.db";
/// Default database name for client/server backends.
pub const DEFAULT_DATABASE_NAME: &str = "mcengine_ai";

/// TOML-backed configuration lookup.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    root: toml::Table,
    data_dir: PathBuf,
}

impl Settings {
    /// Parse settings from TOML text. Relative paths resolve against `data_dir`.
    pub fn from_toml_str(source: &str, data_dir: impl Into<PathBuf>) -> CoreResult<Self> {
        let root: toml::Table = source
            .parse()
            .map_err(|e| CoreError::ConfigurationError(format!("Invalid TOML: {e}")))?;
        Ok(Self {
            root,
            data_dir: data_dir.into(),
        })
    }

    /// Load settings from a TOML file; its parent directory becomes the data directory.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigurationError(format!("Failed to read {}: {e}", path.display()))
        })?;
        let data_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_toml_str(&source, data_dir)
    }

    /// Directory that relative file paths are resolved against.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn lookup(&self, key: &str) -> Option<&toml::Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        segments.try_fold(self.root.get(first)?, |value, segment| {
            value.as_table()?.get(segment)
        })
    }

    /// String value for `key`, or `default` if the key is missing.
    ///
    /// Integers and booleans are rendered as strings; tables and arrays are a configuration error.
    pub fn get_string(&self, key: &str, default: &str) -> CoreResult<String> {
        match self.lookup(key) {
            None => Ok(default.to_string()),
            Some(toml::Value::String(s)) => Ok(s.clone()),
            Some(toml::Value::Integer(i)) => Ok(i.to_string()),
            Some(toml::Value::Boolean(b)) => Ok(b.to_string()),
            Some(other) => Err(CoreError::ConfigurationError(format!(
                "`{key}` must be a string, got {}",
                other.type_str()
            ))),
        }
    }

    /// Port-like value; accepts either `3306` or `"3306"`.
    pub fn get_u16(&self, key: &str, default: u16) -> CoreResult<u16> {
        match self.lookup(key) {
            None => Ok(default),
            Some(toml::Value::Integer(i)) => u16::try_from(*i).map_err(|_| {
                CoreError::ConfigurationError(format!("`{key}` is out of range: {i}"))
            }),
            Some(toml::Value::String(s)) => s.trim().parse().map_err(|_| {
                CoreError::ConfigurationError(format!("`{key}` is not a valid number: {s}"))
            }),
            Some(other) => Err(CoreError::ConfigurationError(format!(
                "`{key}` must be a number, got {}",
                other.type_str()
            ))),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> CoreResult<bool> {
        match self.lookup(key) {
            None => Ok(default),
            Some(toml::Value::Boolean(b)) => Ok(*b),
            Some(toml::Value::String(s)) => s.trim().parse().map_err(|_| {
                CoreError::ConfigurationError(format!("`{key}` is not a valid boolean: {s}"))
            }),
            Some(other) => Err(CoreError::ConfigurationError(format!(
                "`{key}` must be a boolean, got {}",
                other.type_str()
            ))),
        }
    }
}

/// Connection parameters for a client/server backend.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Require TLS (MySQL only, off by default).
    pub ssl: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .field("ssl", &self.ssl)
            .finish()
    }
}

/// Typed database selection plus its connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    Sqlite { path: PathBuf },
    MySql(ServerConfig),
    Postgres(ServerConfig),
}

impl DatabaseConfig {
    /// Resolve `database.type` and the matching `database.<type>.*` keys.
    ///
    /// An unknown `database.type` is a hard error; there is no fallback backend.
    pub fn from_settings(settings: &Settings) -> CoreResult<Self> {
        let kind: BackendKind = settings
            .get_string("database.type", BackendKind::Sqlite.as_str())?
            .parse()?;

        match kind {
            BackendKind::Sqlite => {
                let file = settings.get_string("database.sqlite.path", DEFAULT_SQLITE_PATH)?;
                Ok(Self::Sqlite {
                    path: settings.data_dir().join(file),
                })
            }
            BackendKind::MySql => Ok(Self::MySql(server_config(settings, kind, 3306, "root")?)),
            BackendKind::Postgres => Ok(Self::Postgres(server_config(
                settings, kind, 5432, "postgres",
            )?)),
        }
    }

    pub fn backend(&self) -> BackendKind {
        match self {
            Self::Sqlite { .. } => BackendKind::Sqlite,
            Self::MySql(_) => BackendKind::MySql,
            Self::Postgres(_) => BackendKind::Postgres,
        }
    }
}

fn server_config(
    settings: &Settings,
    kind: BackendKind,
    default_port: u16,
    default_user: &str,
) -> CoreResult<ServerConfig> {
    let prefix = format!("database.{kind}");
    Ok(ServerConfig {
        host: settings.get_string(&format!("{prefix}.host"), "localhost")?,
        port: settings.get_u16(&format!("{prefix}.port"), default_port)?,
        database: settings.get_string(&format!("{prefix}.name"), DEFAULT_DATABASE_NAME)?,
        user: settings.get_string(&format!("{prefix}.user"), default_user)?,
        password: settings.get_string(&format!("{prefix}.password"), "")?,
        ssl: settings.get_bool(&format!("{prefix}.ssl"), false)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(source: &str) -> Settings {
        Settings::from_toml_str(source, "/srv/plugin").unwrap()
    }

    #[test]
    fn empty_config_defaults_to_sqlite_in_data_dir() {
        let config = DatabaseConfig::from_settings(&settings("")).unwrap();
        assert_eq!(
            config,
            DatabaseConfig::Sqlite {
                path: PathBuf::from("/srv/plugin/artificialintelligence.db")
            }
        );
    }

    #[test]
    fn sqlite_custom_path() {
        let config = DatabaseConfig::from_settings(&settings(
            r#"
            [database]
            type = "sqlite"
            sqlite.path = "data/tokens.db"
            "#,
        ))
        .unwrap();
        assert_eq!(
            config,
            DatabaseConfig::Sqlite {
                path: PathBuf::from("/srv/plugin/data/tokens.db")
            }
        );
    }

    #[test]
    fn mysql_defaults() {
        let config = DatabaseConfig::from_settings(&settings("database.type = \"MySQL\"")).unwrap();
        let DatabaseConfig::MySql(server) = config else {
            panic!("expected mysql config");
        };
        assert_eq!(server.host, "localhost");
        assert_eq!(server.port, 3306);
        assert_eq!(server.database, "mcengine_ai");
        assert_eq!(server.user, "root");
        assert_eq!(server.password, "");
        assert!(!server.ssl);
    }

    #[test]
    fn postgres_values_and_string_port() {
        let config = DatabaseConfig::from_settings(&settings(
            r#"
            [database]
            type = "postgresql"

            [database.postgresql]
            host = "db.internal"
            port = "6543"
            name = "ai"
            user = "svc"
            password = "p@ss:word"
            "#,
        ))
        .unwrap();
        assert_eq!(config.backend(), BackendKind::Postgres);
        let DatabaseConfig::Postgres(server) = config else {
            panic!("expected postgres config");
        };
        assert_eq!(server.host, "db.internal");
        assert_eq!(server.port, 6543);
        assert_eq!(server.database, "ai");
        assert_eq!(server.user, "svc");
        assert_eq!(server.password, "p@ss:word");
    }

    #[test]
    fn unknown_backend_fails_fast() {
        let err = DatabaseConfig::from_settings(&settings("database.type = \"oracle\"")).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedBackend(ref s) if s == "oracle"));
    }

    #[test]
    fn invalid_port_is_configuration_error() {
        for source in [
            "database.type = \"mysql\"\ndatabase.mysql.port = 70000",
            "database.type = \"mysql\"\ndatabase.mysql.port = \"abc\"",
            "database.type = \"mysql\"\ndatabase.mysql.port = [1]",
        ] {
            let err = DatabaseConfig::from_settings(&settings(source)).unwrap_err();
            assert!(matches!(err, CoreError::ConfigurationError(_)), "{source}");
        }
    }

    #[test]
    fn invalid_toml_is_configuration_error() {
        let err = Settings::from_toml_str("database = [", ".").unwrap_err();
        assert!(matches!(err, CoreError::ConfigurationError(_)));
    }

    #[test]
    fn load_uses_file_directory_as_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[database]\ntype = \"sqlite\"\n").unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.data_dir(), tmp.path());
        assert_eq!(loaded.get_string("database.type", "x").unwrap(), "sqlite");
        assert_eq!(loaded.get_string("database.missing", "x").unwrap(), "x");
    }

    #[test]
    fn debug_hides_password() {
        let server = ServerConfig {
            host: "h".into(),
            port: 1,
            database: "d".into(),
            user: "u".into(),
            password: "hunter2".into(),
            ssl: false,
        };
        assert!(!format!("{server:?}").contains("hunter2"));
    }
}
