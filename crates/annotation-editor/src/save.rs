//! Save coordinator
//!
//! Serializes submissions: at most one save is in flight per session. The
//! in-flight flag is owned here and is the single source of truth; the view
//! only mirrors it.
//!
//! There is no retry and no timeout. A save runs until the host settles it.

use annotation_core::{AnnotationHost, SaveError};
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of a coordinated save that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Host persisted the text
    Completed,
    /// Another save was already in flight; nothing was sent
    Busy,
}

/// Single in-flight save guard
#[derive(Debug, Default)]
pub struct SaveCoordinator {
    saving: AtomicBool,
}

impl SaveCoordinator {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly while a save is in flight
    #[inline]
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Persist `text` through `host`
    ///
    /// Returns `SaveOutcome::Busy` without calling the host if a save is
    /// already running.
    ///
    /// # Errors
    /// The host's `SaveError`, unchanged. The flag is cleared first.
    pub async fn save(
        &self,
        host: &dyn AnnotationHost,
        text: &str,
    ) -> Result<SaveOutcome, SaveError> {
        let Some(in_flight) = self.begin() else {
            tracing::warn!("save rejected: another save is in flight");
            return Ok(SaveOutcome::Busy);
        };
        in_flight.persist(host, text).await?;
        Ok(SaveOutcome::Completed)
    }

    /// Claim the in-flight slot, or `None` if a save is already running
    ///
    /// Lets a caller reserve the slot while it still holds its own state
    /// lock, then persist after releasing it.
    #[must_use]
    pub fn begin(&self) -> Option<InFlight<'_>> {
        self.saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight { flag: &self.saving })
    }
}

/// A claimed save slot. Clears the saving flag when dropped, so the flag
/// is released whether the save settles or its future is abandoned.
#[derive(Debug)]
#[must_use = "dropping the slot releases it immediately"]
pub struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl InFlight<'_> {
    /// Hand `text` to the host and wait for it to settle
    ///
    /// # Errors
    /// The host's `SaveError`, unchanged.
    pub async fn persist(self, host: &dyn AnnotationHost, text: &str) -> Result<(), SaveError> {
        tracing::debug!(chars = text.chars().count(), "save started");
        host.save(text).await
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotation_test_utils::RecordingHost;

    #[tokio::test]
    async fn completed_save_clears_flag() {
        let coordinator = SaveCoordinator::new();
        let host = RecordingHost::new();

        let outcome = coordinator.save(&host, "orders table").await;

        assert_eq!(outcome, Ok(SaveOutcome::Completed));
        assert!(!coordinator.is_saving());
        assert_eq!(host.saved(), vec!["orders table".to_string()]);
    }

    #[tokio::test]
    async fn failed_save_clears_flag_and_propagates() {
        let coordinator = SaveCoordinator::new();
        let host = RecordingHost::new().fail_next(SaveError::Rejected("conflict".into()));

        let outcome = coordinator.save(&host, "x").await;

        assert_eq!(outcome, Err(SaveError::Rejected("conflict".into())));
        assert!(!coordinator.is_saving());
    }

    #[tokio::test]
    async fn overlapping_save_is_busy() {
        let coordinator = SaveCoordinator::new();
        let host = RecordingHost::gated();

        let (first, second) = tokio::join!(coordinator.save(&host, "first"), async {
            host.wait_started().await;
            assert!(coordinator.is_saving());
            let second = coordinator.save(&host, "second").await;
            host.release();
            second
        });

        assert_eq!(first, Ok(SaveOutcome::Completed));
        assert_eq!(second, Ok(SaveOutcome::Busy));
        assert_eq!(host.save_calls(), 1);
        assert!(!coordinator.is_saving());
    }

    #[test]
    fn slot_is_exclusive_until_dropped() {
        let coordinator = SaveCoordinator::new();

        let slot = coordinator.begin();
        assert!(slot.is_some());
        assert!(coordinator.begin().is_none());

        drop(slot);
        assert!(!coordinator.is_saving());
        assert!(coordinator.begin().is_some());
    }

    #[tokio::test]
    async fn dropped_save_future_releases_flag() {
        let coordinator = SaveCoordinator::new();
        let host = RecordingHost::gated();

        {
            let pending = coordinator.save(&host, "abandoned");
            tokio::pin!(pending);
            tokio::select! {
                _ = &mut pending => unreachable!("gate never opened"),
                () = host.wait_started() => assert!(coordinator.is_saving()),
            }
        }

        assert!(!coordinator.is_saving());
    }
}
