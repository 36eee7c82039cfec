//! Facade configuration.

use crate::naming::validate_domain;
use serde::Deserialize;
use thiserror::Error;

/// Configuration for a [`ManagementFacade`](super::ManagementFacade).
///
/// # Examples
///
/// ```
/// use palladio::facade::FacadeConfig;
///
/// let config = FacadeConfig::default();
/// assert_eq!(config.default_domain, "DefaultDomain");
/// assert!(config.refresh_info_on_describe);
///
/// let snapshot_only = FacadeConfig::snapshot_only();
/// assert!(!snapshot_only.refresh_info_on_describe);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FacadeConfig {
    /// Domain reported by `default_domain`.
    pub default_domain: String,
    /// Whether `describe` asks the object for fresh metadata.
    pub refresh_info_on_describe: bool,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            default_domain: "DefaultDomain".to_owned(),
            refresh_info_on_describe: true,
        }
    }
}

impl FacadeConfig {
    /// Creates a configuration whose `describe` serves the registration-time
    /// metadata snapshot without calling the object.
    #[must_use]
    pub fn snapshot_only() -> Self {
        Self {
            refresh_info_on_describe: false,
            ..Default::default()
        }
    }

    /// Replaces the default domain.
    #[must_use]
    pub fn with_default_domain(mut self, domain: impl Into<String>) -> Self {
        self.default_domain = domain.into();
        self
    }

    /// Loads and validates a JSON configuration document.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::InvalidDomain`] when the default domain is unusable.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDomain`] when the default domain is
    /// empty, holds a reserved character or is a wildcard pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let reason = if self.default_domain.trim().is_empty() {
            "must not be empty"
        } else {
            match validate_domain(&self.default_domain) {
                Ok(false) => return Ok(()),
                Ok(true) => "must not contain '*' or '?'",
                Err(_) => "must not contain ':' or a newline",
            }
        };
        Err(ConfigError::InvalidDomain {
            domain: self.default_domain.clone(),
            reason,
        })
    }
}

/// Errors raised while loading a [`FacadeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid configuration JSON.
    #[error("cannot parse facade configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The default domain is unusable.
    #[error("invalid default domain '{domain}': {reason}")]
    InvalidDomain {
        /// Rejected domain.
        domain: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
