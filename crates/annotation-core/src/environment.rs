//! The environment an editor runs inside
//!
//! Produced by the bootstrap shell once authentication, device and
//! subscription checks have passed. Carries everything the editor's
//! collaborators need as one value.

use crate::collaborators::{AnalyticsSink, Clipboard, Notifier};
use crate::config::EditorConfig;
use crate::events::{AnalyticsEvent, Notification};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Authenticated operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable user identifier
    pub user_id: String,
    /// Contact email, if known
    #[serde(default)]
    pub email: Option<String>,
    /// Bearer token for API calls
    #[serde(skip_serializing)]
    pub access_token: String,
}

impl Principal {
    #[inline]
    #[must_use]
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            access_token: access_token.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Data-fetch context: where API calls go and how they authenticate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiContext {
    pub base_url: String,
    pub bearer_token: String,
}

impl ApiContext {
    #[inline]
    #[must_use]
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
        }
    }

    /// Join `path` onto the base URL
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Value for the `Authorization` header
    #[inline]
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.bearer_token)
    }
}

/// Everything an editor session needs from the outside world
#[derive(Clone)]
pub struct Environment {
    /// Operator on whose behalf edits happen
    pub principal: Principal,
    /// Data-fetch context
    pub api: ApiContext,
    /// Editor limits and copy
    pub config: EditorConfig,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl Environment {
    /// Create environment with default editor configuration
    #[must_use]
    pub fn new(
        principal: Principal,
        api: ApiContext,
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            principal,
            api,
            config: EditorConfig::default(),
            clipboard,
            notifier,
            analytics,
        }
    }

    /// With editor configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    #[must_use]
    pub fn clipboard(&self) -> &dyn Clipboard {
        self.clipboard.as_ref()
    }

    /// Emit a notification
    #[inline]
    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Track an analytics event, tagged with the principal
    pub fn track(&self, event: AnalyticsEvent) {
        self.analytics
            .track(event.with_property("user_id", self.principal.user_id.clone()));
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("principal", &self.principal.user_id)
            .field("api", &self.api.base_url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
