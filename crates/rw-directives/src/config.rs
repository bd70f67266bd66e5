//! Directive configuration.
//!
//! Selects which built-in directives a parser recognizes. Parsed from the
//! `[directives]` section of a TOML file:
//!
//! ```toml
//! [directives]
//! enabled = ["note", "tab", "details"]
//! ```
//!
//! An empty or missing list enables every built-in kind.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::kinds::BUILTIN_NAMES;

/// Configuration file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    directives: DirectivesConfig,
}

/// Enabled directive kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectivesConfig {
    /// Built-in directive names, in registration order.
    pub enabled: Vec<String>,
}

impl DirectivesConfig {
    /// Enable the given built-in directives.
    #[must_use]
    pub fn with_enabled<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the `[directives]` section of a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.directives.validate()?;
        Ok(file.directives)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), enabled = config.enabled.len(), "Loaded directive config");
        Ok(config)
    }

    /// Names to register, falling back to all built-in kinds.
    #[must_use]
    pub fn enabled(&self) -> Vec<&str> {
        if self.enabled.is_empty() {
            BUILTIN_NAMES.to_vec()
        } else {
            self.enabled.iter().map(String::as_str).collect()
        }
    }

    /// Check that every enabled name is a built-in kind.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.enabled.iter().find(|name| !BUILTIN_NAMES.contains(&name.as_str())) {
            Some(name) => Err(ConfigError::UnknownDirective(name.clone())),
            None => Ok(()),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Enabled name that is not a built-in directive.
    #[error("Unknown directive in configuration: {0}")]
    UnknownDirective(String),
}
