//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// School-specific settings the engine folds into payloads and messages.
///
/// Deserializable from TOML so a deployment can override the defaults
/// without rebuilding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Backend identifier of the school the widget is embedded for
    #[serde(default = "default_school_id")]
    pub school_id: i64,
    /// Display name used in bot messages
    #[serde(default = "default_school_name")]
    pub school_name: String,
    /// Admissions contact surfaced on unrecoverable submission failures
    #[serde(default = "default_admissions_email")]
    pub admissions_email: String,
    #[serde(default = "default_admissions_phone")]
    pub admissions_phone: String,
}

fn default_school_id() -> i64 {
    2
}

fn default_school_name() -> String {
    "More House School".to_string()
}

fn default_admissions_email() -> String {
    "office@morehousemail.org.uk".to_string()
}

fn default_admissions_phone() -> String {
    "020 7235 2855".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            school_id: default_school_id(),
            school_name: default_school_name(),
            admissions_email: default_admissions_email(),
            admissions_phone: default_admissions_phone(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML, filling omitted keys with the
    /// defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
