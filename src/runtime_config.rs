//! # Runtime Configuration Module
//!
//! Loads matcher options and logging settings from an optional TOML file and
//! from environment variables. Environment variables override file values.
//!
//! ## Environment Variables
//!
//! | Variable | Field |
//! |---|---|
//! | `TINYROUTER_CASE_SENSITIVE` | `matcher.case_sensitive` (`true`/`false`/`1`/`0`) |
//! | `TINYROUTER_PATH_SEPARATOR` | `matcher.path_separator` |
//! | `TINYROUTER_WILDCARD` | `matcher.wildcard` |
//! | `TINYROUTER_GREEDY_WILDCARD` | `matcher.greedy_wildcard` |
//! | `TINYROUTER_UNCONSTRAINED_VAR` | `matcher.unconstrained_variable` |
//! | `TINYROUTER_LOG_LEVEL` | `logging.log_level` |
//! | `TINYROUTER_LOG_FORMAT` | `logging.format` |
//! | `TINYROUTER_LOG_TARGET_FILTER` | `logging.target_filter` (comma-separated directives) |
//! | `TINYROUTER_LOG_INCLUDE_LOCATION` | `logging.include_location` (`true`/`false`) |
//!
//! ## File Format
//!
//! ```toml
//! [matcher]
//! case_sensitive = true
//! unconstrained_variable = "[^/]+"
//!
//! [logging]
//! log_level = "debug"
//! format = "json"
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use tinyrouter::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env().unwrap();
//! println!("Case sensitive: {}", config.matcher.case_sensitive);
//! ```
//!
//! Every loader validates the matcher sub-patterns before returning, so a
//! sub-pattern that opens a capture group is reported at startup instead of
//! corrupting variable extraction later.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::logging::LogConfig;
use crate::pattern::MatcherOptions;

/// Runtime configuration: matcher options plus logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub matcher: MatcherOptions,
    pub logging: LogConfig,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by the variables `lookup` resolves.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    pub fn load_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: RuntimeConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("TINYROUTER_CASE_SENSITIVE") {
            self.matcher.case_sensitive = parse_bool(&value)
                .with_context(|| format!("Invalid TINYROUTER_CASE_SENSITIVE value '{value}'"))?;
        }
        if let Some(value) = lookup("TINYROUTER_PATH_SEPARATOR") {
            self.matcher.path_separator = value;
        }
        if let Some(value) = lookup("TINYROUTER_WILDCARD") {
            self.matcher.wildcard = value;
        }
        if let Some(value) = lookup("TINYROUTER_GREEDY_WILDCARD") {
            self.matcher.greedy_wildcard = value;
        }
        if let Some(value) = lookup("TINYROUTER_UNCONSTRAINED_VAR") {
            self.matcher.unconstrained_variable = value;
        }
        self.logging.apply_env(&lookup);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.matcher
            .validate()
            .context("Invalid matcher configuration")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |key: &str| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert!(!config.matcher.case_sensitive);
    }

    #[test]
    fn test_env_overrides() {
        let config = RuntimeConfig::from_lookup(env(&[
            ("TINYROUTER_CASE_SENSITIVE", "1"),
            ("TINYROUTER_UNCONSTRAINED_VAR", "[^/]+"),
            ("TINYROUTER_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert!(config.matcher.case_sensitive);
        assert_eq!(config.matcher.unconstrained_variable, "[^/]+");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_log_target_and_location_overrides() {
        let config = RuntimeConfig::from_lookup(env(&[
            ("TINYROUTER_LOG_TARGET_FILTER", "tinyrouter::router=trace"),
            ("TINYROUTER_LOG_INCLUDE_LOCATION", "true"),
        ]))
        .unwrap();
        assert_eq!(
            config.logging.target_filter.as_deref(),
            Some("tinyrouter::router=trace")
        );
        assert!(config.logging.include_location);
    }

    #[test]
    fn test_invalid_bool_is_rejected() {
        let err = RuntimeConfig::from_lookup(env(&[("TINYROUTER_CASE_SENSITIVE", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("TINYROUTER_CASE_SENSITIVE"));
    }

    #[test]
    fn test_capturing_env_sub_pattern_is_rejected() {
        let err = RuntimeConfig::from_lookup(env(&[("TINYROUTER_WILDCARD", "(.*)")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid matcher configuration");
    }

    #[test]
    fn test_load_file_with_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[matcher]\ncase_sensitive = true\nwildcard = \"[^/]*\"\n\n[logging]\nlog_level = \"debug\"\n"
        )
        .unwrap();

        let config =
            RuntimeConfig::load_with(file.path(), env(&[("TINYROUTER_CASE_SENSITIVE", "false")]))
                .unwrap();
        assert!(!config.matcher.case_sensitive);
        assert_eq!(config.matcher.wildcard, "[^/]*");
        assert_eq!(config.matcher.greedy_wildcard, "[^?#]*");
        assert_eq!(config.logging.log_level, "debug");
    }

    #[test]
    fn test_load_missing_file() {
        let err = RuntimeConfig::load_with(Path::new("/nonexistent/tinyrouter.toml"), env(&[]))
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config file"));
    }
}
