//! Error types for the annotation editor
//!
//! None of these are fatal. Each is recovered at the editor boundary and
//! presented to the operator for correction or retry.

use annotation_core::{SaveError, ValidationError};

/// Main editor error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// Draft failed local validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Injected persistence operation failed
    #[error("save failed: {0}")]
    Save(#[from] SaveError),

    /// Input or submission attempted while the edit lock is engaged
    #[error("description is locked for editing")]
    EditLocked,

    /// Lock toggled while a save is in flight
    #[error("a save is already in progress")]
    SaveInProgress,

    /// Session was cancelled
    #[error("editor session is closed")]
    SessionClosed,
}

impl EditorError {
    /// Operator can retry the same action unchanged
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Save(_) | Self::SaveInProgress)
    }

    /// Operator must change something (text or lock) first
    #[inline]
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::EditLocked)
    }
}
