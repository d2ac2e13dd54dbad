//! Render model
//!
//! An immutable snapshot of everything the view layer needs to draw the
//! editor. Rendering itself (icons, layout, tooltips) happens elsewhere.

use crate::edit_lock::EditLock;
use crate::form::{description_length, DescriptionForm};
use annotation_core::{EditorConfig, IconRef, Resource};
use serde::Serialize;

/// Tooltip on the lock button
pub const LOCK_TOOLTIP: &str = "Enable or disable editing the table description.";

/// Icon shown on the lock button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockIcon {
    Lock,
    Unlock,
}

/// Snapshot of one editor session for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorView {
    pub title: String,
    pub id_line: String,
    pub icon: IconRef,
    pub label: String,
    pub help: String,
    pub draft: String,
    pub character_count: usize,
    pub max_length: usize,
    pub field_enabled: bool,
    pub lock_icon: LockIcon,
    pub lock_tooltip: &'static str,
    pub validation_message: Option<String>,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub show_spinner: bool,
}

impl EditorView {
    pub(crate) fn build(
        resource: &Resource,
        lock: &EditLock,
        form: &DescriptionForm,
        saving: bool,
        config: &EditorConfig,
    ) -> Self {
        let unlocked = !lock.is_locked();
        Self {
            title: resource.name.clone(),
            id_line: format!("ID {}", resource.id),
            icon: resource.icon.clone(),
            label: config.description_label.clone(),
            help: config.description_help.clone(),
            draft: form.draft().to_string(),
            character_count: description_length(form.draft()),
            max_length: form.max_length(),
            field_enabled: unlocked,
            lock_icon: if unlocked { LockIcon::Unlock } else { LockIcon::Lock },
            lock_tooltip: LOCK_TOOLTIP,
            validation_message: form.error().map(ToString::to_string),
            submit_label: if saving { "Saving" } else { "Save" },
            submit_enabled: !saving,
            show_spinner: saving,
        }
    }
}
