//! Annotation Core - shared vocabulary for the annotation editor
//!
//! Provides:
//! - The externally owned `Resource` being annotated
//! - The error taxonomy (validation, save, clipboard, configuration)
//! - `EditorConfig` with TOML loading
//! - Collaborator seams (`AnnotationHost`, `Clipboard`, `Notifier`, `AnalyticsSink`)
//! - The `Environment` value the bootstrap shell hands to every editor
//!
//! # Example
//!
//! ```rust
//! use annotation_core::{Resource, ResourceId};
//!
//! let resource = Resource::new("tbl_123", "orders", "table")
//!     .with_description("legacy table");
//!
//! assert_eq!(resource.id, ResourceId::new("tbl_123"));
//! assert!(resource.has_description());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod collaborators;
pub mod config;
pub mod environment;
pub mod error;
pub mod events;
pub mod types;

pub use collaborators::{AnalyticsSink, AnnotationHost, Clipboard, Notifier};
pub use config::EditorConfig;
pub use environment::{ApiContext, Environment, Principal};
pub use error::{ClipboardError, ConfigError, SaveError, ValidationError};
pub use events::{AnalyticsEvent, Notification, NotificationVariant};
pub use types::{IconRef, Resource, ResourceId, SessionId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for implementing collaborators
    pub use crate::{
        AnalyticsSink, AnnotationHost, Clipboard, ClipboardError, EditorConfig, Environment,
        Notification, Notifier, Resource, ResourceId, SaveError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
