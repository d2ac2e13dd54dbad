//! Annotation Shell - the bootstrap pipeline every console page runs inside
//!
//! Provides:
//! - `AppShell`, evaluating auth, device, subscription, analytics and
//!   data-fetch gates and producing an `Environment`
//! - `ShellConfig` with TOML loading
//! - In-process collaborators for running the editor from the console
//!
//! # Example
//!
//! ```rust,ignore
//! use annotation_shell::{AppShell, PageRequest};
//!
//! # async fn example(shell: AppShell) -> Result<(), annotation_shell::ShellError> {
//! let env = shell.bootstrap(&PageRequest::desktop("/databases")).await?;
//! println!("api at {}", env.api.base_url);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod local;
pub mod providers;
pub mod shell;

pub use config::ShellConfig;
pub use error::ShellError;
pub use providers::{AuthProvider, DeviceClass, PageRequest, SubscriptionProvider, SubscriptionStatus};
pub use shell::{AppShell, ShellServices};
