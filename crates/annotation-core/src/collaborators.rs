//! Collaborator seams
//!
//! The editor never touches storage, the system clipboard or the toast layer
//! directly. Each is reached through one of these traits, implemented by the
//! host application (or by fakes in tests).

use crate::error::{ClipboardError, SaveError};
use crate::events::{AnalyticsEvent, Notification};
use async_trait::async_trait;

/// The parent view hosting an editor session
#[async_trait]
pub trait AnnotationHost: Send + Sync {
    /// Persist the new description. Empty means "no description".
    ///
    /// # Errors
    /// Any `SaveError` is surfaced to the operator; the draft is kept.
    async fn save(&self, description: &str) -> Result<(), SaveError>;

    /// Operator discarded the editor without saving
    fn cancel(&self);
}

/// System clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Place `text` on the clipboard
    ///
    /// # Errors
    /// Returns `ClipboardError` when the write did not happen.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Toast / notification layer. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Analytics sink. Fire-and-forget.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent);
}
