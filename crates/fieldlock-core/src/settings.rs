//! Global settings
//!
//! Process-wide defaults that apply when neither a model nor any of its
//! parents declares an option.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`Settings::quiet_default`]
pub const QUIET_ENV: &str = "FIELDLOCK_QUIET";

fn default_true() -> bool {
    true
}

/// Global policy defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Default for `quiet` (silently drop denied writes)
    #[serde(default = "default_true")]
    pub quiet_default: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quiet_default: true,
        }
    }
}

impl Settings {
    /// Load settings from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults, overridden by `FIELDLOCK_QUIET` when set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override(std::env::var(QUIET_ENV).ok().as_deref())
    }

    /// Apply an optional raw `FIELDLOCK_QUIET` value
    pub fn with_env_override(mut self, quiet: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = quiet {
            self.quiet_default = parse_bool(raw).ok_or_else(|| {
                ConfigError::Parse(format!("{} must be a boolean, got {:?}", QUIET_ENV, raw))
            })?;
            tracing::debug!(quiet_default = self.quiet_default, "quiet default taken from environment");
        }
        Ok(self)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
