//! Identifier copy action
//!
//! Independent of the lock/save state machine: may run at any time,
//! including while a save is in flight. Never fails toward the caller; the
//! outcome is reported to the operator as a notification.

use annotation_core::{AnalyticsEvent, Environment, Notification, ResourceId};

/// What happened to a copy request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed,
}

/// Place `id` on the clipboard and notify the operator
pub async fn copy_resource_id(env: &Environment, id: &ResourceId) -> CopyOutcome {
    match env.clipboard().write_text(id.as_str()).await {
        Ok(()) => {
            tracing::debug!(resource_id = %id, "resource id copied");
            env.notify(Notification::success(env.config.copy_success_message.clone()));
            env.track(AnalyticsEvent::new("resource_id_copied").with_property("resource_id", id.as_str()));
            CopyOutcome::Copied
        }
        Err(cause) => {
            tracing::error!(resource_id = %id, error = %cause, "could not copy resource id");
            env.notify(Notification::error(env.config.copy_failure_message.clone()));
            CopyOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotation_core::{Clipboard, ClipboardError, NotificationVariant};
    use annotation_test_utils::{environment_with, RecordingAnalytics, RecordingNotifier};
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Arc;

    mock! {
        pub SystemClipboard {}

        #[async_trait]
        impl Clipboard for SystemClipboard {
            async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
        }
    }

    #[tokio::test]
    async fn writes_exact_id_and_notifies_success() {
        let mut clipboard = MockSystemClipboard::new();
        clipboard
            .expect_write_text()
            .withf(|text| text.to_string() == "tbl_123")
            .times(1)
            .returning(|_| Ok(()));
        let notifier = Arc::new(RecordingNotifier::new());
        let analytics = Arc::new(RecordingAnalytics::new());
        let env = environment_with(Arc::new(clipboard), notifier.clone(), analytics.clone());

        let outcome = copy_resource_id(&env, &ResourceId::new("tbl_123")).await;

        assert_eq!(outcome, CopyOutcome::Copied);
        let sent = notifier.notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].variant, NotificationVariant::Success);
        assert_eq!(sent[0].message, "Database ID copied!");
        assert_eq!(analytics.names(), vec!["resource_id_copied".to_string()]);
    }

    #[tokio::test]
    async fn failure_notifies_error_and_does_not_track() {
        let mut clipboard = MockSystemClipboard::new();
        clipboard
            .expect_write_text()
            .times(1)
            .returning(|_| Err(ClipboardError::Denied("no focus".into())));
        let notifier = Arc::new(RecordingNotifier::new());
        let analytics = Arc::new(RecordingAnalytics::new());
        let env = environment_with(Arc::new(clipboard), notifier.clone(), analytics.clone());

        let outcome = copy_resource_id(&env, &ResourceId::new("tbl_123")).await;

        assert_eq!(outcome, CopyOutcome::Failed);
        assert_eq!(
            notifier.notifications(),
            vec![Notification::error("Could not copy the Database ID")]
        );
        assert!(analytics.names().is_empty());
    }
}
