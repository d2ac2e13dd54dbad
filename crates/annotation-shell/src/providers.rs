//! Provider seams consulted during bootstrap

use annotation_core::Principal;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Source of the signed-in operator
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_principal(&self) -> Option<Principal>;
}

/// Billing state of the operator's organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Unknown,
}

impl SubscriptionStatus {
    /// Statuses that grant access to the console
    #[inline]
    #[must_use]
    pub fn grants_access(self) -> bool {
        matches!(self, Self::Active | Self::Trialing)
    }
}

/// Source of subscription status
#[async_trait]
pub trait SubscriptionProvider: Send + Sync {
    async fn status(&self, principal: &Principal) -> SubscriptionStatus;
}

/// Client form factor of the incoming page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

/// A page about to be rendered inside the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    pub device: DeviceClass,
}

impl PageRequest {
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>, device: DeviceClass) -> Self {
        Self {
            path: path.into(),
            device,
        }
    }

    #[inline]
    #[must_use]
    pub fn desktop(path: impl Into<String>) -> Self {
        Self::new(path, DeviceClass::Desktop)
    }
}
