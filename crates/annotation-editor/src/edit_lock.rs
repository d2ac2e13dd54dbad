//! Edit-lock controller
//!
//! Protects an existing annotation from accidental edits. The initial state
//! is derived once from the resource and never recomputed afterwards.

use annotation_core::Resource;
use serde::{Deserialize, Serialize};

/// Whether the description field accepts input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Locked,
    Unlocked,
}

impl LockState {
    /// The opposite state
    #[inline]
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Locked => Self::Unlocked,
            Self::Unlocked => Self::Locked,
        }
    }
}

/// Two-state toggle gating user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditLock {
    state: LockState,
}

impl EditLock {
    /// Locked when the resource already carries a description
    #[inline]
    #[must_use]
    pub fn for_resource(resource: &Resource) -> Self {
        let state = if resource.has_description() {
            LockState::Locked
        } else {
            LockState::Unlocked
        };
        Self { state }
    }

    #[inline]
    #[must_use]
    pub fn new(state: LockState) -> Self {
        Self { state }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> LockState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }

    /// Flip the lock and return the new state
    #[inline]
    pub fn toggle(&mut self) -> LockState {
        self.state = self.state.flipped();
        self.state
    }
}
