//! Editor configuration
//!
//! Limits and operator-facing copy. Every field has a default so a partial
//! TOML table is enough:
//!
//! ```toml
//! max_description_length = 1000
//! copy_success_message = "ID copied"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default maximum description length, in characters
pub const DEFAULT_MAX_DESCRIPTION_LENGTH: usize = 500;

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum description length in characters
    pub max_description_length: usize,
    /// Toast shown after the identifier was copied
    pub copy_success_message: String,
    /// Toast shown when copying failed
    pub copy_failure_message: String,
    /// Toast shown when the save operation failed
    pub save_failure_message: String,
    /// Label above the description field
    pub description_label: String,
    /// Help text under the label
    pub description_help: String,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With maximum description length
    #[inline]
    #[must_use]
    pub fn with_max_description_length(mut self, max: usize) -> Self {
        self.max_description_length = max;
        self
    }

    /// With copy messages
    #[inline]
    #[must_use]
    pub fn with_copy_messages(
        mut self,
        success: impl Into<String>,
        failure: impl Into<String>,
    ) -> Self {
        self.copy_success_message = success.into();
        self.copy_failure_message = failure.into();
        self
    }

    /// With save failure message
    #[inline]
    #[must_use]
    pub fn with_save_failure_message(mut self, message: impl Into<String>) -> Self {
        self.save_failure_message = message.into();
        self
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML
    /// - `ConfigError::Invalid` if a value is unusable
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_description_length == 0 {
            return Err(ConfigError::invalid(
                "max_description_length",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_description_length: DEFAULT_MAX_DESCRIPTION_LENGTH,
            copy_success_message: "Database ID copied!".to_string(),
            copy_failure_message: "Could not copy the Database ID".to_string(),
            save_failure_message: "Could not save the table description".to_string(),
            description_label: "Table description".to_string(),
            description_help:
                "Text descriptions help instruct the AI on how to use a specific table."
                    .to_string(),
        }
    }
}
