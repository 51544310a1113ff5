//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$GRAFT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/graft/config.toml`
//! 3. `~/.graft/config.toml` (canonical write location)
//!
//! # Repo Config
//!
//! Located at `.graft/config.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing: the default branch must be a
//! valid single-component branch name and date offsets must read `+HH:MM` or `-HH:MM`.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchName;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// default_branch = "main"
/// date_offset = "+01:00"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Branch created by `init`
    pub default_branch: Option<String>,

    /// UTC offset used when printing commit dates
    pub date_offset: Option<String>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(branch) = &self.default_branch {
            BranchName::local(branch).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid default branch name: {}", e))
            })?;
        }
        if let Some(offset) = &self.date_offset {
            parse_offset(offset)?;
        }
        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// date_offset = "+00:00"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// UTC offset used when printing commit dates
    pub date_offset: Option<String>,
}

impl RepoConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(offset) = &self.date_offset {
            parse_offset(offset)?;
        }
        Ok(())
    }
}

/// Parse a `+HH:MM` / `-HH:MM` UTC offset.
pub fn parse_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || {
        ConfigError::InvalidValue(format!(
            "invalid date offset '{}', expected +HH:MM or -HH:MM",
            raw
        ))
    };

    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod global_config {
        use super::*;

        #[test]
        fn parse_full() {
            let toml = r#"
                default_branch = "main"
                date_offset = "+05:30"
            "#;
            let config: GlobalConfig = toml::from_str(toml).unwrap();
            assert_eq!(config.default_branch, Some("main".to_string()));
            assert_eq!(config.date_offset, Some("+05:30".to_string()));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn parse_empty() {
            let config: GlobalConfig = toml::from_str("").unwrap();
            assert_eq!(config, GlobalConfig::default());
        }

        #[test]
        fn invalid_branch_rejected() {
            let config = GlobalConfig {
                default_branch: Some("bad..name".to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn unknown_field_rejected() {
            let result: Result<GlobalConfig, _> = toml::from_str("trunk = \"main\"");
            assert!(result.is_err());
        }
    }

    mod repo_config {
        use super::*;

        #[test]
        fn invalid_offset_rejected() {
            let config = RepoConfig {
                date_offset: Some("8 hours".to_string()),
            };
            assert!(config.validate().is_err());
        }
    }

    mod offsets {
        use super::*;

        #[test]
        fn valid_offsets() {
            assert_eq!(parse_offset("-08:00").unwrap().local_minus_utc(), -8 * 3600);
            assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 5 * 3600 + 1800);
            assert_eq!(parse_offset("+00:00").unwrap().local_minus_utc(), 0);
        }

        #[test]
        fn malformed_offsets() {
            for bad in ["", "08:00", "+8:00", "+08", "+24:00", "+08:60", "+ab:cd"] {
                assert!(parse_offset(bad).is_err(), "{bad} should be rejected");
            }
        }
    }
}
