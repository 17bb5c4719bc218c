//! Unit tests for configuration and graceful degradation
//!
//! Tests the implementation of:
//! - Missing TOML files fall back to defaults without failing
//! - Invalid TOML files are reported
//! - Config file resolution order (argument, environment, default)
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate WFH_CONFIG are marked with #[serial].

use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wfh_common::config::{
    resolve_config_path, Config, Overrides, TomlConfig, CONFIG_ENV_VAR,
};
use wfh_common::Error;

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = TomlConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.port, 5780);
    assert!(config.admin_secret.is_none());
}

#[test]
fn test_invalid_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "roster = [1, 2").unwrap();

    match TomlConfig::load_or_default(&path) {
        Err(Error::Config(msg)) => assert!(msg.contains("config.toml"), "{}", msg),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_file_roster_and_secret_flow_into_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "admin_secret = \"office\"\nroster = [\"Ann Ray\", \"Ben Oku\"]\n",
    )
    .unwrap();

    let file = TomlConfig::load_or_default(&path).unwrap();
    let config = Config::resolve(file, Overrides::default()).unwrap();
    assert_eq!(config.admin_secret, "office");
    assert!(config.roster.contains("Ben Oku"));
    assert!(!config.roster.contains("Karabo Kotu"));
}

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/wfh-env-config.toml");
    let resolved = resolve_config_path(Some(Path::new("/tmp/wfh-cli.toml")));
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(resolved, Some(PathBuf::from("/tmp/wfh-cli.toml")));
}

#[test]
#[serial]
fn test_env_var_used_without_argument() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/wfh-env-config.toml");
    let resolved = resolve_config_path(None);
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(resolved, Some(PathBuf::from("/tmp/wfh-env-config.toml")));
}

#[test]
#[serial]
fn test_default_location_without_overrides() {
    env::remove_var(CONFIG_ENV_VAR);
    if let Some(path) = resolve_config_path(None) {
        assert!(path.ends_with("wfh/config.toml"));
    }
}
