//! Annotation Editor - view, unlock, validate and persist a resource description
//!
//! Components:
//! - `edit_lock`: locked/unlocked toggle gating input
//! - `form`: draft text and length validation
//! - `save`: single in-flight save coordination
//! - `copy_id`: identifier copy with operator notification
//! - `editor`: the `AnnotationEditor` session tying them together
//! - `view`: render model for the view layer
//!
//! # Example
//!
//! ```rust,ignore
//! use annotation_editor::{AnnotationEditor, SubmitOutcome};
//!
//! # async fn example(env: annotation_core::Environment, host: std::sync::Arc<dyn annotation_core::AnnotationHost>) {
//! let resource = annotation_core::Resource::new("tbl_123", "orders", "table");
//! let editor = AnnotationEditor::open(resource, host, env);
//!
//! editor.input("Orders placed by customers, one row per order").unwrap();
//! assert_eq!(editor.submit().await, Ok(SubmitOutcome::Saved));
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod copy_id;
pub mod edit_lock;
pub mod editor;
pub mod error;
pub mod form;
pub mod save;
pub mod view;

pub use copy_id::{copy_resource_id, CopyOutcome};
pub use edit_lock::{EditLock, LockState};
pub use editor::{AnnotationEditor, SubmitOutcome};
pub use error::EditorError;
pub use form::{description_length, validate_description, DescriptionForm};
pub use save::{InFlight, SaveCoordinator, SaveOutcome};
pub use view::{EditorView, LockIcon};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving an editor session
    pub use crate::{AnnotationEditor, EditorError, EditorView, LockState, SubmitOutcome};
}
