//! Configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (or their environment fallbacks)
//! 2. TOML configuration file
//! 3. Compiled defaults
//!
//! A missing TOML file is not an error: the defaults apply and the caller
//! decides how to report it. A file that exists but does not parse is a
//! `Config` error.

use crate::roster::Roster;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "WFH_CONFIG";

/// Secret used when none is configured
pub const DEFAULT_ADMIN_SECRET: &str = "tamuda";

pub const DATA_FILE_NAME: &str = "wfh_selections.csv";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Path to the selections CSV file
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Staff eligible to submit; defaults to the built-in roster
    #[serde(default)]
    pub roster: Option<Vec<String>>,

    /// Shared secret for admin reset
    #[serde(default)]
    pub admin_secret: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            bind_address: default_bind_address(),
            port: default_port(),
            roster: None,
            admin_secret: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load from `path`; `None` if the file does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map(Some).map_err(|e| match e {
                Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
                other => other,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Config(format!(
                "Cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Load from `path`, falling back to defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        Ok(Self::load(path)?.unwrap_or_default())
    }
}

/// Locate the TOML config file
///
/// Priority: explicit argument, then `WFH_CONFIG`, then the per-user
/// config directory (`<config_dir>/wfh/config.toml`).
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|d| d.join("wfh").join("config.toml"))
}

/// OS-dependent default location of the selections file
pub fn default_data_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("wfh").join(DATA_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_FILE_NAME))
}

/// Values supplied on the command line; `None` defers to the TOML file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_file: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub admin_secret: Option<String>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub roster: Roster,
    pub admin_secret: String,
    pub log_level: String,
}

impl Config {
    /// Merge command-line overrides over the TOML file over defaults
    pub fn resolve(file: TomlConfig, overrides: Overrides) -> Result<Self> {
        let roster = match file.roster {
            Some(names) => Roster::new(names)?,
            None => Roster::default(),
        };

        let admin_secret = overrides
            .admin_secret
            .or(file.admin_secret)
            .unwrap_or_else(|| DEFAULT_ADMIN_SECRET.to_string());
        if admin_secret.is_empty() {
            return Err(Error::Config("admin_secret must not be empty".to_string()));
        }

        Ok(Self {
            data_file: overrides
                .data_file
                .or(file.data_file)
                .unwrap_or_else(default_data_file),
            bind_address: overrides.bind_address.unwrap_or(file.bind_address),
            port: overrides.port.unwrap_or(file.port),
            roster,
            admin_secret,
            log_level: overrides.log_level.unwrap_or(file.logging.level),
        })
    }

    /// True if the compiled-in admin secret is in effect
    pub fn uses_default_secret(&self) -> bool {
        self.admin_secret == DEFAULT_ADMIN_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = TomlConfig::parse("").unwrap();
        assert_eq!(config.port, 5780);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
        assert!(config.roster.is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let text = r#"
            data_file = "/srv/wfh/selections.csv"
            port = 8080
            roster = ["Ann", "Ben"]
            admin_secret = "s3cret"

            [logging]
            level = "debug"
        "#;
        let config = TomlConfig::parse(text).unwrap();
        assert_eq!(config.data_file, Some(PathBuf::from("/srv/wfh/selections.csv")));
        assert_eq!(config.port, 8080);
        assert_eq!(config.roster, Some(vec!["Ann".to_string(), "Ben".to_string()]));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        assert!(matches!(TomlConfig::parse("port = \"high\""), Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_priority() {
        let file = TomlConfig {
            port: 8080,
            admin_secret: Some("from-file".to_string()),
            ..TomlConfig::default()
        };
        let overrides = Overrides {
            admin_secret: Some("from-cli".to_string()),
            ..Overrides::default()
        };
        let config = Config::resolve(file, overrides).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.admin_secret, "from-cli");
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn test_resolve_defaults() {
        let config = Config::resolve(TomlConfig::default(), Overrides::default()).unwrap();
        assert!(config.uses_default_secret());
        assert_eq!(config.roster, Roster::default());
        assert!(config.data_file.ends_with(DATA_FILE_NAME));
    }

    #[test]
    fn test_resolve_rejects_bad_roster_and_secret() {
        let file = TomlConfig {
            roster: Some(vec!["Ann".to_string(), "Ann".to_string()]),
            ..TomlConfig::default()
        };
        assert!(Config::resolve(file, Overrides::default()).is_err());

        let overrides = Overrides {
            admin_secret: Some(String::new()),
            ..Overrides::default()
        };
        assert!(Config::resolve(TomlConfig::default(), overrides).is_err());
    }
}
