//! Integration tests for configuration loading and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate REQFORGE_CONFIG are marked with #[serial].

use reqforge_common::config::{
    load_or_default, load_toml_config, resolve_config_path, write_toml_config, EngineSettings,
    LoggingConfig, TomlConfig, CONFIG_ENV_VAR,
};
use reqforge_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn sample_config() -> TomlConfig {
    TomlConfig {
        engine: EngineSettings {
            cache_enabled: false,
            cache_ttl_ms: 2_500,
            cache_max_entries: 64,
            max_concurrent_checks: 2,
            max_concurrent_validations: 6,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

#[test]
fn test_write_then_load_preserves_all_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    write_toml_config(&sample_config(), &path).unwrap();
    let loaded = load_toml_config(&path).unwrap();

    assert_eq!(loaded, sample_config());
    // Temp file cleaned up by rename
    assert!(!temp_dir.path().join("config.toml.tmp").exists());
}

#[test]
fn test_write_creates_missing_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("reqforge").join("config.toml");

    write_toml_config(&TomlConfig::default(), &path).unwrap();

    assert!(path.exists());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("does-not-exist.toml");

    let config = load_or_default(Some(path.as_path())).unwrap();

    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_no_path_uses_defaults() {
    let config = load_or_default(None).unwrap();
    assert_eq!(config.engine, EngineSettings::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[engine]\nmax_concurrent_checks = \"three\"\n").unwrap();

    let err = load_or_default(Some(path.as_path())).unwrap_err();

    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_unreadable_file_is_an_error() {
    // A directory exists at the path but cannot be read as a file
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::create_dir(&path).unwrap();

    let err = load_or_default(Some(path.as_path())).unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}

#[test]
#[serial]
fn test_env_var_used_when_no_cli_argument() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");

    let resolved = resolve_config_path(None, CONFIG_ENV_VAR);

    env::remove_var(CONFIG_ENV_VAR);
    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-env.toml")));
}

#[test]
#[serial]
fn test_cli_argument_overrides_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");

    let cli = PathBuf::from("/tmp/from-cli.toml");
    let resolved = resolve_config_path(Some(cli.as_path()), CONFIG_ENV_VAR);

    env::remove_var(CONFIG_ENV_VAR);
    assert_eq!(resolved, Some(cli));
}
