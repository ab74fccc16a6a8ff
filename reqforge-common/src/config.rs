//! Configuration loading and config file resolution
//!
//! Configuration is bootstrap-only: it is read once when an engine is built.
//!
//! # Config File Resolution Priority
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`REQFORGE_CONFIG`)
//! 3. User config file (`~/.config/reqforge/config.toml` on Linux)
//! 4. Compiled defaults (no file)
//!
//! A missing file never aborts startup: the loader warns and falls back to
//! compiled defaults. A file that exists but cannot be read or parsed is an
//! error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "REQFORGE_CONFIG";

/// Root TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Validation engine settings
    #[serde(default)]
    pub engine: EngineSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Validation engine settings (`[engine]` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Cache validation results by document id
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Cache time-to-live in milliseconds
    ///
    /// Default: 300000 (5 minutes)
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Cache size ceiling before sweep/eviction
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Rule checks allowed in flight for a single document
    #[serde(default = "default_max_concurrent_checks")]
    pub max_concurrent_checks: usize,

    /// Document validations allowed in flight per engine
    #[serde(default = "default_max_concurrent_validations")]
    pub max_concurrent_validations: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cache_enabled: default_cache_enabled(),
            cache_ttl_ms: default_cache_ttl_ms(),
            cache_max_entries: default_cache_max_entries(),
            max_concurrent_checks: default_max_concurrent_checks(),
            max_concurrent_validations: default_max_concurrent_validations(),
        }
    }
}

/// Logging configuration (`[logging]` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_ms() -> u64 {
    300_000
}

fn default_cache_max_entries() -> usize {
    1_000
}

fn default_max_concurrent_checks() -> usize {
    3
}

fn default_max_concurrent_validations() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve which config file to read, if any
///
/// Returns `None` when no explicit path is given and the user config file
/// does not exist (compiled defaults apply).
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: User config file
    default_config_path().filter(|path| path.exists())
}

/// Platform config file location (`<config_dir>/reqforge/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("reqforge").join("config.toml"))
}

/// Parse configuration from TOML text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Load configuration from a TOML file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_toml_config(&content)
}

/// Load configuration, degrading to compiled defaults
///
/// A missing file logs a warning and yields defaults. A file that exists but
/// does not parse is an error (fail fast on misconfiguration).
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        info!("No config file found, using compiled defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} not found, using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let config = load_toml_config(path)?;
    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Write configuration to a TOML file
///
/// Writes to a sibling temp file first, then renames over the target.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let settings = EngineSettings::default();
        assert!(settings.cache_enabled);
        assert_eq!(settings.cache_ttl_ms, 300_000);
        assert_eq!(settings.cache_max_entries, 1_000);
        assert_eq!(settings.max_concurrent_checks, 3);
        assert_eq!(settings.max_concurrent_validations, 10);
        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = parse_toml_config("").unwrap();
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_partial_engine_table() {
        let config = parse_toml_config(
            r#"
            [engine]
            cache_ttl_ms = 1500
            max_concurrent_validations = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.cache_ttl_ms, 1500);
        assert_eq!(config.engine.max_concurrent_validations, 4);
        // Unspecified keys keep defaults
        assert_eq!(config.engine.max_concurrent_checks, 3);
        assert!(config.engine.cache_enabled);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = parse_toml_config("[engine\ncache_ttl_ms = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_wrong_value_type_is_config_error() {
        let err = parse_toml_config("[engine]\ncache_enabled = \"yes\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_cli_argument_wins() {
        let path = resolve_config_path(Some(Path::new("/tmp/explicit.toml")), "REQFORGE_UNUSED_VAR");
        assert_eq!(path, Some(PathBuf::from("/tmp/explicit.toml")));
    }
}
