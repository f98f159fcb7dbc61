//! Engine configuration.
//!
//! Supports TOML config files, environment variable overrides, and defaults.

use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReprError;

/// What the deserializer does with a JSON key no field declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Skip the key (forward compatibility with newer servers)
    #[default]
    Ignore,
    /// Fail with `ReprError::UnknownField`
    Reject,
}

impl FromStr for UnknownFieldPolicy {
    type Err = ReprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(UnknownFieldPolicy::Ignore),
            "reject" => Ok(UnknownFieldPolicy::Reject),
            other => Err(ReprError::Config(format!("Invalid unknown_fields policy: {}", other))),
        }
    }
}

impl fmt::Display for UnknownFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownFieldPolicy::Ignore => f.write_str("ignore"),
            UnknownFieldPolicy::Reject => f.write_str("reject"),
        }
    }
}

/// Serialization and deserialization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReprConfig {
    /// Handling of undeclared keys (default: ignore)
    pub unknown_fields: UnknownFieldPolicy,
    /// Accept a bare JSON number for a numeric-string field (default: true)
    pub accept_bare_numbers: bool,
    /// Pretty-print wire output (default: false)
    pub pretty: bool,
}

impl Default for ReprConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Ignore,
            accept_bare_numbers: true,
            pretty: false,
        }
    }
}

impl ReprConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that rejects unknown keys and bare numbers for numeric strings.
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Reject,
            accept_bare_numbers: false,
            pretty: false,
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReprError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ReprError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ReprError> {
        toml::from_str(toml_str).map_err(|e| ReprError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Saves the configuration to a TOML file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ReprError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ReprError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path.as_ref(), toml)
            .map_err(|e| ReprError::Config(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ReprError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Applies environment variable overrides.
    /// Environment variables are prefixed with `REPR_`.
    /// Example: `REPR_UNKNOWN_FIELDS=reject` overrides `unknown_fields`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ReprError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ReprError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("REPR_UNKNOWN_FIELDS") {
            self.unknown_fields = val.parse()?;
        }
        if let Some(val) = lookup("REPR_ACCEPT_BARE_NUMBERS") {
            self.accept_bare_numbers = val.parse().map_err(|_| {
                ReprError::Config(format!("Invalid accept_bare_numbers: {}", val))
            })?;
        }
        if let Some(val) = lookup("REPR_PRETTY") {
            self.pretty = val
                .parse()
                .map_err(|_| ReprError::Config(format!("Invalid pretty: {}", val)))?;
        }
        Ok(())
    }
}
