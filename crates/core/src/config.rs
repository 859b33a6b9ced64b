use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://tably.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            logging: LoggingConfig { level: "info".to_string() },
        }
    }
}

/// Partial config as read from `tably.toml`; omitted keys keep defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
}

impl AppConfig {
    /// Load configuration in layers: defaults, then an optional config file,
    /// then `TABLY_*` environment overrides, then validation.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("tably.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("TABLY_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("TABLY_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("TABLY_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("TABLY_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("TABLY_DATABASE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("TABLY_LOG_LEVEL") {
            self.logging.level = value;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }
    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }
    if database.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("tably.toml"), PathBuf::from("config/tably.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, LoadOptions};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    const TABLY_VARS: &[&str] = &[
        "TABLY_DATABASE_URL",
        "TABLY_DATABASE_MAX_CONNECTIONS",
        "TABLY_DATABASE_TIMEOUT_SECS",
        "TABLY_LOG_LEVEL",
    ];

    #[test]
    fn defaults_validate() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(TABLY_VARS);

        let config = AppConfig::load(LoadOptions::default()).expect("load defaults");
        assert_eq!(config.database.url, "sqlite://tably.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn file_patch_overrides_defaults() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(TABLY_VARS);

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tably.toml");
        fs::write(
            &path,
            "[database]\nurl = \"sqlite://custom.db\"\nmax_connections = 2\n\n[logging]\nlevel = \"debug\"\n",
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(path),
            require_file: true,
        })
        .expect("load file");

        assert_eq!(config.database.url, "sqlite://custom.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn env_overrides_win_over_file() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(TABLY_VARS);

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tably.toml");
        fs::write(&path, "[database]\nurl = \"sqlite://from-file.db\"\n").expect("write config");

        env::set_var("TABLY_DATABASE_URL", "sqlite://from-env.db");
        let result = AppConfig::load(LoadOptions {
            config_path: Some(path),
            require_file: true,
        });
        clear_vars(TABLY_VARS);

        let config = result.expect("load");
        assert_eq!(config.database.url, "sqlite://from-env.db");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(TABLY_VARS);

        let result = AppConfig::load(LoadOptions {
            config_path: Some("does-not-exist.toml".into()),
            require_file: true,
        });
        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[test]
    fn non_sqlite_url_fails_validation() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(TABLY_VARS);

        env::set_var("TABLY_DATABASE_URL", "postgres://localhost/tably");
        let result = AppConfig::load(LoadOptions::default());
        clear_vars(TABLY_VARS);

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn malformed_env_override_is_an_error() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(TABLY_VARS);

        env::set_var("TABLY_DATABASE_MAX_CONNECTIONS", "lots");
        let result = AppConfig::load(LoadOptions::default());
        clear_vars(TABLY_VARS);

        assert!(matches!(result, Err(ConfigError::InvalidEnvOverride { .. })));
    }
}
