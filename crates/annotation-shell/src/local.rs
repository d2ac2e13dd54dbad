//! In-process collaborators
//!
//! Used by the console binary to run the editor without a browser, backend
//! or system clipboard.

use crate::providers::{AuthProvider, SubscriptionProvider, SubscriptionStatus};
use annotation_core::{
    AnalyticsEvent, AnalyticsSink, AnnotationHost, Clipboard, ClipboardError, Notification,
    NotificationVariant, Notifier, Principal, ResourceId, SaveError,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Fixed principal (or none)
#[derive(Debug, Clone, Default)]
pub struct StaticAuth(pub Option<Principal>);

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_principal(&self) -> Option<Principal> {
        self.0.clone()
    }
}

/// Fixed subscription status
#[derive(Debug, Clone, Copy)]
pub struct StaticSubscription(pub SubscriptionStatus);

#[async_trait]
impl SubscriptionProvider for StaticSubscription {
    async fn status(&self, _principal: &Principal) -> SubscriptionStatus {
        self.0
    }
}

/// Clipboard backed by a string slot
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

/// Prints notifications to stdout, as text or JSON lines
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotifier {
    json: bool,
}

impl StdoutNotifier {
    #[must_use]
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn render(&self, notification: &Notification) -> String {
        if self.json {
            return serde_json::to_string(notification)
                .unwrap_or_else(|_| notification.message.clone());
        }
        let tag = match notification.variant {
            NotificationVariant::Success => "ok",
            NotificationVariant::Error => "error",
        };
        format!("[{tag}] {}", notification.message)
    }

    fn write_to(&self, out: &mut impl Write, notification: &Notification) {
        let line = self.render(notification);
        if let Err(err) = writeln!(out, "{line}") {
            tracing::warn!(error = %err, variant = ?notification.variant, "could not print notification");
        }
    }
}

impl Notifier for StdoutNotifier {
    fn notify(&self, notification: Notification) {
        self.write_to(&mut std::io::stdout().lock(), &notification);
    }
}

/// Analytics sink that logs every event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        tracing::info!(event = %event.name, properties = ?event.properties, "analytics");
    }
}

/// Description storage keyed by resource
#[derive(Debug, Default)]
pub struct MemoryStore {
    descriptions: Mutex<HashMap<ResourceId, String>>,
    failure: Option<SaveError>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every save fails with `error`
    #[must_use]
    pub fn failing(error: SaveError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(&self, id: &ResourceId) -> Option<String> {
        self.descriptions.lock().get(id).cloned()
    }

    /// Host for one editor session on `id`
    #[must_use]
    pub fn host_for(self: &Arc<Self>, id: ResourceId) -> MemoryHost {
        MemoryHost {
            store: Arc::clone(self),
            resource_id: id,
            cancelled: AtomicBool::new(false),
        }
    }
}

/// `AnnotationHost` writing into a `MemoryStore`
#[derive(Debug)]
pub struct MemoryHost {
    store: Arc<MemoryStore>,
    resource_id: ResourceId,
    cancelled: AtomicBool,
}

impl MemoryHost {
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[async_trait]
impl AnnotationHost for MemoryHost {
    async fn save(&self, description: &str) -> Result<(), SaveError> {
        if let Some(error) = &self.store.failure {
            return Err(error.clone());
        }
        let mut descriptions = self.store.descriptions.lock();
        if description.is_empty() {
            descriptions.remove(&self.resource_id);
        } else {
            descriptions.insert(self.resource_id.clone(), description.to_string());
        }
        Ok(())
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
