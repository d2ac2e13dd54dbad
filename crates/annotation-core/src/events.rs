//! Outbound events: operator notifications and analytics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Notification flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Success,
    Error,
}

/// A fire-and-forget message for the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub variant: NotificationVariant,
    pub message: String,
}

impl Notification {
    #[inline]
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Success,
            message: message.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Error,
            message: message.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.variant == NotificationVariant::Error
    }
}

/// Analytics event tracked through the environment's sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Event name (`page_view`, `description_saved`, ...)
    pub name: String,
    /// Flat string properties
    pub properties: BTreeMap<String, String>,
    /// When the event was produced
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// Create event stamped with the current time
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Add property
    #[inline]
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Look up a property
    #[inline]
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
