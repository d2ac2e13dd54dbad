//! Shell configuration
//!
//! ```toml
//! api_base_url = "https://console.example.com/api/v1"
//! require_subscription = true
//!
//! [editor]
//! max_description_length = 500
//! ```

use crate::error::ShellError;
use annotation_core::{ConfigError, EditorConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shell configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Base URL for the data-fetch context
    pub api_base_url: String,
    /// Refuse pages when the subscription does not grant access
    pub require_subscription: bool,
    /// Serve mobile clients instead of redirecting them
    pub allow_mobile: bool,
    /// Where mobile clients are redirected
    pub mobile_redirect_path: String,
    /// Editor limits and copy
    pub editor: EditorConfig,
}

impl ShellConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// With subscription enforcement
    #[inline]
    #[must_use]
    pub fn with_require_subscription(mut self, required: bool) -> Self {
        self.require_subscription = required;
        self
    }

    /// With mobile access
    #[inline]
    #[must_use]
    pub fn with_allow_mobile(mut self, allowed: bool) -> Self {
        self.allow_mobile = allowed;
        self
    }

    /// With editor configuration
    #[inline]
    #[must_use]
    pub fn with_editor(mut self, editor: EditorConfig) -> Self {
        self.editor = editor;
        self
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// `ConfigError` on malformed TOML or unusable values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// `ShellError::Config` when the file is unreadable, malformed or holds
    /// unusable values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShellError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "shell configuration loaded");
        Ok(config)
    }

    /// # Errors
    /// `ConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::invalid(
                "api_base_url",
                format!("expected an http(s) URL, got `{}`", self.api_base_url),
            ));
        }
        if !self.mobile_redirect_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "mobile_redirect_path",
                "must be an absolute path",
            ));
        }
        self.editor.validate()
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost/api/v1".to_string(),
            require_subscription: true,
            allow_mobile: false,
            mobile_redirect_path: "/mobile".to_string(),
            editor: EditorConfig::default(),
        }
    }
}
