//! Error types for the bootstrap shell

use crate::providers::SubscriptionStatus;
use annotation_core::ConfigError;

/// Bootstrap failure. Each variant names the gate that stopped the page.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// No authenticated principal
    #[error("not authenticated")]
    Unauthenticated,

    /// Device class not served; the page should redirect
    #[error("unsupported device, redirect to {redirect_to}")]
    UnsupportedDevice {
        /// Where the page should send the operator
        redirect_to: String,
    },

    /// Subscription required but not in good standing
    #[error("subscription inactive: {status:?}")]
    SubscriptionInactive {
        /// Status reported by the subscription provider
        status: SubscriptionStatus,
    },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ShellError {
    /// Redirect target for gates that redirect instead of erroring out
    #[inline]
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::UnsupportedDevice { redirect_to } => Some(redirect_to),
            _ => None,
        }
    }
}
