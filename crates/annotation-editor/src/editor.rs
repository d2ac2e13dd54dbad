//! Annotation editor session
//!
//! Ties the edit lock, the form and the save coordinator together for one
//! resource. States are `{Locked, Unlocked} x {Idle, Saving}`:
//!
//! ```text
//! Locked.Idle     --toggle-->          Unlocked.Idle
//! Unlocked.Idle   --toggle-->          Locked.Idle
//! Unlocked.Idle   --submit (valid)-->  Unlocked.Saving
//! Unlocked.Saving --success-->         Unlocked.Idle
//! Unlocked.Saving --failure-->         Unlocked.Idle   (draft kept)
//! Unlocked.Idle   --submit (invalid)-> Unlocked.Idle   (error surfaced)
//! ```
//!
//! `Locked.Saving` is unreachable: submit needs the lock open, and the lock
//! cannot be toggled while a save is in flight.
//!
//! All operations take `&self`, so the view can keep servicing events
//! (copying the ID, typing) while `submit` is suspended on the host. Every
//! operation logs inside the session's `annotation_session` span.

use crate::copy_id::{copy_resource_id, CopyOutcome};
use crate::edit_lock::{EditLock, LockState};
use crate::error::EditorError;
use crate::form::DescriptionForm;
use crate::save::SaveCoordinator;
use crate::view::EditorView;
use annotation_core::{
    AnalyticsEvent, AnnotationHost, Environment, Notification, Resource, SessionId,
    ValidationError,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{Instrument, Span};

/// Result of a submit that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Host persisted the draft; closing the editor is up to the caller
    Saved,
    /// A save was already in flight; this submit did nothing
    Busy,
}

#[derive(Debug)]
struct SessionState {
    resource: Resource,
    lock: EditLock,
    form: DescriptionForm,
    closed: bool,
}

/// One editor instance, from mount to close
pub struct AnnotationEditor {
    id: SessionId,
    span: Span,
    env: Environment,
    host: Arc<dyn AnnotationHost>,
    saves: SaveCoordinator,
    state: Mutex<SessionState>,
}

impl AnnotationEditor {
    /// Mount an editor for `resource`
    ///
    /// The draft starts as the resource's description (or empty) and the
    /// lock starts engaged only when that description is non-empty.
    #[must_use]
    pub fn open(resource: Resource, host: Arc<dyn AnnotationHost>, env: Environment) -> Self {
        let id = SessionId::new();
        let lock = EditLock::for_resource(&resource);
        let form = DescriptionForm::new(
            resource.description_or_empty(),
            env.config.max_description_length,
        );

        let span = tracing::info_span!("annotation_session", session = %id, resource_id = %resource.id);
        span.in_scope(|| {
            tracing::info!(locked = lock.is_locked(), "annotation session opened");
        });

        Self {
            id,
            span,
            env,
            host,
            saves: SaveCoordinator::new(),
            state: Mutex::new(SessionState {
                resource,
                lock,
                form,
                closed: false,
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn resource(&self) -> Resource {
        self.state.lock().resource.clone()
    }

    #[must_use]
    pub fn draft(&self) -> String {
        self.state.lock().form.draft().to_string()
    }

    #[must_use]
    pub fn validation_error(&self) -> Option<ValidationError> {
        self.state.lock().form.error().cloned()
    }

    #[must_use]
    pub fn lock_state(&self) -> LockState {
        self.state.lock().lock.state()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state.lock().lock.is_locked()
    }

    /// True exactly while a submitted save is in flight
    #[inline]
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saves.is_saving()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Flip the edit lock. The draft is kept either way.
    ///
    /// # Errors
    /// - `EditorError::SessionClosed` after `cancel`
    /// - `EditorError::SaveInProgress` while a save is in flight
    pub fn toggle_lock(&self) -> Result<LockState, EditorError> {
        let _entered = self.span.enter();
        let mut state = self.state.lock();
        if state.closed {
            return Err(EditorError::SessionClosed);
        }
        if self.saves.is_saving() {
            tracing::warn!("lock toggle rejected during save");
            return Err(EditorError::SaveInProgress);
        }
        let next = state.lock.toggle();
        tracing::debug!(state = ?next, "edit lock toggled");
        Ok(next)
    }

    /// Operator typed into the description field
    ///
    /// # Errors
    /// - `EditorError::SessionClosed` after `cancel`
    /// - `EditorError::EditLocked` while locked; the draft is unchanged
    pub fn input(&self, text: impl Into<String>) -> Result<(), EditorError> {
        let _entered = self.span.enter();
        let mut state = self.state.lock();
        if state.closed {
            return Err(EditorError::SessionClosed);
        }
        let SessionState { lock, form, .. } = &mut *state;
        if let Err(err) = form.input(lock, text) {
            tracing::warn!("input rejected: {}", err);
            return Err(err);
        }
        tracing::debug!(
            chars = form.draft().chars().count(),
            valid = form.error().is_none(),
            "input accepted"
        );
        Ok(())
    }

    /// Programmatic refresh from the parent view
    ///
    /// Replaces the resource and the draft regardless of the lock. The lock
    /// state itself is not recomputed.
    pub fn reset_from_resource(&self, resource: Resource) {
        let _entered = self.span.enter();
        let mut state = self.state.lock();
        state.form.reset(resource.description_or_empty());
        tracing::debug!(resource_id = %resource.id, "session reset from resource");
        state.resource = resource;
    }

    /// Validate the draft and persist it through the host
    ///
    /// # Errors
    /// - `EditorError::SessionClosed` after `cancel`
    /// - `EditorError::EditLocked` while locked; the host is not called
    /// - `EditorError::Validation` if the draft is too long; the host is not called
    /// - `EditorError::Save` if the host failed; the draft is kept and an
    ///   error notification is emitted
    pub async fn submit(&self) -> Result<SubmitOutcome, EditorError> {
        self.submit_in_span().instrument(self.span.clone()).await
    }

    async fn submit_in_span(&self) -> Result<SubmitOutcome, EditorError> {
        // The slot is claimed last, and only the state lock holder claims it,
        // so a rejected submit never shows up as `saving`.
        let (in_flight, text) = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(EditorError::SessionClosed);
            }
            if self.saves.is_saving() {
                tracing::warn!("submit ignored: save in flight");
                return Ok(SubmitOutcome::Busy);
            }
            if state.lock.is_locked() {
                tracing::warn!("submit rejected: description locked");
                return Err(EditorError::EditLocked);
            }
            let text = match state.form.submission() {
                Ok(text) => text.to_string(),
                Err(err) => {
                    tracing::warn!("submit rejected: {}", err);
                    return Err(err.into());
                }
            };
            let Some(in_flight) = self.saves.begin() else {
                tracing::warn!("submit ignored: save in flight");
                return Ok(SubmitOutcome::Busy);
            };
            (in_flight, text)
        };

        match in_flight.persist(self.host.as_ref(), &text).await {
            Ok(()) => {
                tracing::info!(chars = text.chars().count(), "description saved");
                let resource_id = self.state.lock().resource.id.clone();
                self.env.track(
                    AnalyticsEvent::new("description_saved")
                        .with_property("resource_id", resource_id.as_str()),
                );
                Ok(SubmitOutcome::Saved)
            }
            Err(err) => {
                tracing::error!(error = %err, "description save failed");
                self.env
                    .notify(Notification::error(self.env.config.save_failure_message.clone()));
                Err(err.into())
            }
        }
    }

    /// Copy the resource identifier to the clipboard
    ///
    /// Allowed at any time, including during a save or after close.
    pub async fn copy_id(&self) -> CopyOutcome {
        let id = self.state.lock().resource.id.clone();
        copy_resource_id(&self.env, &id)
            .instrument(self.span.clone())
            .await
    }

    /// Discard the session without saving
    ///
    /// Notifies the host once; later calls are no-ops.
    pub fn cancel(&self) {
        {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
        }
        self.span.in_scope(|| tracing::info!("annotation session cancelled"));
        self.host.cancel();
    }

    /// Snapshot for the view layer
    #[must_use]
    pub fn view(&self) -> EditorView {
        let state = self.state.lock();
        EditorView::build(
            &state.resource,
            &state.lock,
            &state.form,
            self.saves.is_saving(),
            &self.env.config,
        )
    }
}

impl std::fmt::Debug for AnnotationEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationEditor")
            .field("id", &self.id)
            .field("saving", &self.saves.is_saving())
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotation_core::{NotificationVariant, SaveError};
    use annotation_test_utils::{LogCapture, RecordingHost, TestBed};
    use tracing::Level;

    fn open(bed: &TestBed, resource: Resource) -> AnnotationEditor {
        AnnotationEditor::open(resource, bed.host.clone(), bed.environment())
    }

    fn table(description: Option<&str>) -> Resource {
        let resource = Resource::new("tbl_123", "orders", "table");
        match description {
            Some(text) => resource.with_description(text),
            None => resource,
        }
    }

    #[test]
    fn initial_lock_follows_description() {
        let bed = TestBed::new();
        assert!(!open(&bed, table(Some(""))).is_locked());
        assert!(!open(&bed, table(None)).is_locked());
        assert!(open(&bed, table(Some("legacy table"))).is_locked());
    }

    #[test]
    fn draft_seeded_from_description() {
        let bed = TestBed::new();
        assert_eq!(open(&bed, table(Some("legacy table"))).draft(), "legacy table");
        assert_eq!(open(&bed, table(None)).draft(), "");
    }

    #[test]
    fn toggle_twice_restores_state_and_keeps_draft() {
        let bed = TestBed::new();
        let editor = open(&bed, table(None));
        editor.input("half written").unwrap();

        editor.toggle_lock().unwrap();
        assert!(editor.is_locked());
        editor.toggle_lock().unwrap();

        assert!(!editor.is_locked());
        assert_eq!(editor.draft(), "half written");
    }

    #[test]
    fn reset_keeps_lock_state() {
        let bed = TestBed::new();
        let editor = open(&bed, table(None));
        assert!(!editor.is_locked());

        editor.reset_from_resource(table(Some("refreshed elsewhere")));

        assert!(!editor.is_locked());
        assert_eq!(editor.draft(), "refreshed elsewhere");
        assert_eq!(editor.resource().description.as_deref(), Some("refreshed elsewhere"));
    }

    #[test]
    fn reset_on_locked_session_replaces_draft() {
        let bed = TestBed::new();
        let editor = open(&bed, table(Some("legacy table")));
        assert_eq!(editor.input("typed"), Err(EditorError::EditLocked));

        editor.reset_from_resource(table(Some("renamed upstream")));

        assert_eq!(editor.lock_state(), LockState::Locked);
        assert_eq!(editor.draft(), "renamed upstream");
        assert_eq!(editor.validation_error(), None);
    }

    #[test]
    fn reset_revalidates_draft() {
        let bed = TestBed::new();
        let editor = open(&bed, table(Some("legacy table")));

        let oversized = "x".repeat(501);
        editor.reset_from_resource(table(Some(oversized.as_str())));

        assert!(editor.is_locked());
        assert_eq!(
            editor.validation_error(),
            Some(ValidationError::TooLong { length: 501, max: 500 })
        );

        editor.reset_from_resource(table(Some("short again")));
        assert_eq!(editor.validation_error(), None);
    }

    #[tokio::test]
    async fn rejected_submit_does_not_claim_save_slot() {
        let bed = TestBed::new();
        let editor = open(&bed, table(None));
        editor.input("y".repeat(501)).unwrap();

        assert!(matches!(editor.submit().await, Err(EditorError::Validation(_))));
        assert!(!editor.is_saving());

        editor.input("fits").unwrap();
        assert_eq!(editor.submit().await, Ok(SubmitOutcome::Saved));
        assert_eq!(bed.host.saved(), vec!["fits".to_string()]);
    }

    #[tokio::test]
    async fn submit_during_save_is_busy_even_with_invalid_draft() {
        let bed = TestBed::with_host(RecordingHost::gated());
        let editor = open(&bed, table(None));
        editor.input("first").unwrap();

        let (first, second) = tokio::join!(editor.submit(), async {
            bed.host.wait_started().await;
            editor.input("z".repeat(600)).unwrap();
            let second = editor.submit().await;
            bed.host.release();
            second
        });

        assert_eq!(first, Ok(SubmitOutcome::Saved));
        assert_eq!(second, Ok(SubmitOutcome::Busy));
        assert_eq!(bed.host.saved(), vec!["first".to_string()]);

        // once idle, the oversized draft is rejected on its own merits
        assert!(matches!(editor.submit().await, Err(EditorError::Validation(_))));
        assert!(!editor.is_saving());
        assert_eq!(bed.host.save_calls(), 1);
    }

    #[test]
    fn operations_log_inside_session_span() {
        let logs = LogCapture::new();
        let _guard = logs.install();
        let bed = TestBed::new();
        let editor = open(&bed, table(None));

        editor.input("orders").unwrap();
        editor.toggle_lock().unwrap();
        let _ = editor.input("ignored");
        editor.cancel();

        let accepted = logs.find("input accepted").unwrap();
        assert_eq!(accepted.level, Level::DEBUG);
        assert_eq!(accepted.span.as_deref(), Some("annotation_session"));
        for message in [
            "annotation session opened",
            "edit lock toggled",
            "input rejected: description is locked for editing",
            "annotation session cancelled",
        ] {
            let event = logs.find(message).unwrap();
            assert_eq!(event.span.as_deref(), Some("annotation_session"), "{message}");
        }
    }

    #[tokio::test]
    async fn submit_logs_inside_session_span() {
        let logs = LogCapture::new();
        let _guard = logs.install();
        let bed = TestBed::new();
        let editor = open(&bed, table(None));
        editor.input("orders").unwrap();

        editor.submit().await.unwrap();

        let saved = logs.find("description saved").unwrap();
        assert_eq!(saved.level, Level::INFO);
        assert_eq!(saved.span.as_deref(), Some("annotation_session"));
    }

    #[tokio::test]
    async fn submit_while_locked_never_reaches_host() {
        let bed = TestBed::new();
        let editor = open(&bed, table(Some("legacy table")));

        let result = editor.submit().await;

        assert_eq!(result, Err(EditorError::EditLocked));
        assert_eq!(bed.host.save_calls(), 0);
    }

    #[tokio::test]
    async fn successful_submit_tracks_analytics() {
        let bed = TestBed::new();
        let editor = open(&bed, table(None));
        editor.input("orders placed by customers").unwrap();

        assert_eq!(editor.submit().await, Ok(SubmitOutcome::Saved));

        assert_eq!(bed.host.saved(), vec!["orders placed by customers".to_string()]);
        assert_eq!(bed.analytics.names(), vec!["description_saved".to_string()]);
        assert!(bed.notifier.notifications().is_empty());
        assert!(!editor.is_saving());
    }

    #[tokio::test]
    async fn failed_submit_notifies_and_keeps_draft() {
        let bed = TestBed::with_host(
            RecordingHost::new().fail_next(SaveError::Unavailable("503".into())),
        );
        let editor = open(&bed, table(None));
        editor.input("keep me").unwrap();

        let result = editor.submit().await;

        assert!(matches!(result, Err(EditorError::Save(SaveError::Unavailable(_)))));
        assert_eq!(editor.draft(), "keep me");
        assert!(!editor.is_saving());
        let sent = bed.notifier.notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].variant, NotificationVariant::Error);

        // manual retry succeeds with the same draft
        assert_eq!(editor.submit().await, Ok(SubmitOutcome::Saved));
        assert_eq!(bed.host.saved(), vec!["keep me".to_string(), "keep me".to_string()]);
    }

    #[tokio::test]
    async fn toggle_rejected_while_saving() {
        let bed = TestBed::with_host(RecordingHost::gated());
        let editor = open(&bed, table(None));

        let (saved, toggled) = tokio::join!(editor.submit(), async {
            bed.host.wait_started().await;
            let toggled = editor.toggle_lock();
            bed.host.release();
            toggled
        });

        assert_eq!(saved, Ok(SubmitOutcome::Saved));
        assert_eq!(toggled, Err(EditorError::SaveInProgress));
        assert!(!editor.is_locked());
    }

    #[tokio::test]
    async fn cancel_closes_session_once() {
        let bed = TestBed::new();
        let editor = open(&bed, table(None));

        editor.cancel();
        editor.cancel();

        assert!(editor.is_closed());
        assert_eq!(bed.host.cancel_calls(), 1);
        assert_eq!(editor.input("late"), Err(EditorError::SessionClosed));
        assert_eq!(editor.toggle_lock(), Err(EditorError::SessionClosed));
        assert_eq!(editor.submit().await, Err(EditorError::SessionClosed));
        assert_eq!(bed.host.save_calls(), 0);
    }
}
