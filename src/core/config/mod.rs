//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Graft has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$GRAFT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/graft/config.toml`
//! 3. `~/.graft/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use graftwork::core::config::Config;
//! use graftwork::core::paths::RepoPaths;
//! use std::path::PathBuf;
//!
//! let paths = RepoPaths::new(PathBuf::from("/path/to/work"));
//! let config = Config::load(Some(&paths)).unwrap();
//!
//! println!("Default branch: {}", config.default_branch());
//! println!("Dates shown at: {}", config.date_offset());
//! ```

pub mod schema;

pub use schema::{parse_offset, GlobalConfig, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;

use super::paths::RepoPaths;

/// Default branch created by `init`.
pub const DEFAULT_BRANCH: &str = "master";

/// Default offset for printed commit dates.
pub const DEFAULT_DATE_OFFSET: &str = "-08:00";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence rules automatically. Repo config overrides
/// global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `repo` is provided, also loads its repo config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(repo: Option<&RepoPaths>) -> Result<Config, ConfigError> {
        Self::load_with_env(repo, |key| std::env::var(key).ok())
    }

    /// Load configuration, reading environment variables through `env`.
    pub fn load_with_env(
        repo: Option<&RepoPaths>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Config, ConfigError> {
        let global = match Self::find_global(&env) {
            Some(path) => Self::read_toml::<GlobalConfig>(&path)?,
            None => GlobalConfig::default(),
        };

        let repo = match repo.map(RepoPaths::config_path) {
            Some(path) if path.exists() => Some(Self::read_toml::<RepoConfig>(&path)?),
            _ => None,
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(Config { global, repo })
    }

    /// First existing global config file, in precedence order.
    fn find_global(env: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = env("GRAFT_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        if let Some(xdg_home) = env("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("graft/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".graft/config.toml"));
        }
        candidates.into_iter().find(|path| path.is_file())
    }

    /// Read and parse a config file.
    fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the branch `init` creates.
    ///
    /// Defaults to "master" if not configured.
    pub fn default_branch(&self) -> &str {
        self.global
            .default_branch
            .as_deref()
            .unwrap_or(DEFAULT_BRANCH)
    }

    /// Get the offset commit dates are printed in.
    ///
    /// Repo config wins over global config. Defaults to `-08:00`.
    pub fn date_offset(&self) -> FixedOffset {
        let raw = self
            .repo
            .as_ref()
            .and_then(|r| r.date_offset.as_deref())
            .or(self.global.date_offset.as_deref())
            .unwrap_or(DEFAULT_DATE_OFFSET);
        // Loaded values were validated, so the fallback is never reached.
        parse_offset(raw).unwrap_or_else(|_| Utc.fix())
    }
}
