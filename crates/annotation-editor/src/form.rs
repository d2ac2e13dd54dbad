//! Form and validation engine
//!
//! Holds the draft description and its current validation error. The error
//! is recomputed on every change and once more when the form is submitted.
//! Lengths are counted in Unicode scalar values, not bytes.

use crate::edit_lock::EditLock;
use crate::error::EditorError;
use annotation_core::ValidationError;

/// Length of `text` as the operator perceives it
#[inline]
#[must_use]
pub fn description_length(text: &str) -> usize {
    text.chars().count()
}

/// Check a description against the maximum length
///
/// # Errors
/// `ValidationError::TooLong` when `text` is longer than `max`.
pub fn validate_description(text: &str, max: usize) -> Result<(), ValidationError> {
    let length = description_length(text);
    if length > max {
        return Err(ValidationError::TooLong { length, max });
    }
    Ok(())
}

/// Draft description plus its validation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionForm {
    draft: String,
    error: Option<ValidationError>,
    max_length: usize,
}

impl DescriptionForm {
    /// Create form seeded with `initial`, validated immediately
    #[must_use]
    pub fn new(initial: impl Into<String>, max_length: usize) -> Self {
        let draft = initial.into();
        let error = validate_description(&draft, max_length).err();
        Self {
            draft,
            error,
            max_length,
        }
    }

    #[inline]
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Current validation error, if any
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Operator typed into the field
    ///
    /// # Errors
    /// `EditorError::EditLocked` if `lock` is engaged; the draft is untouched.
    pub fn input(&mut self, lock: &EditLock, text: impl Into<String>) -> Result<(), EditorError> {
        if lock.is_locked() {
            return Err(EditorError::EditLocked);
        }
        self.replace(text.into());
        Ok(())
    }

    /// Programmatic reset, bypasses the lock
    pub fn reset(&mut self, text: impl Into<String>) {
        self.replace(text.into());
    }

    /// Re-run validation and hand out the text to persist
    ///
    /// # Errors
    /// The validation error, which also stays surfaced on the form.
    pub fn submission(&mut self) -> Result<&str, ValidationError> {
        self.error = validate_description(&self.draft, self.max_length).err();
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.draft.as_str()),
        }
    }

    fn replace(&mut self, draft: String) {
        self.error = validate_description(&draft, self.max_length).err();
        self.draft = draft;
    }
}
