//! Application bootstrap shell
//!
//! Every console page runs inside the same stack of cross-cutting concerns.
//! Gates are evaluated outermost first:
//! 1. Authentication
//! 2. Device redirect
//! 3. Subscription enforcement
//! 4. Analytics page view
//! 5. Data-fetch context
//!
//! The first failing gate stops the page. On success the shell hands back a
//! single `Environment` that editors take as their precondition.

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::providers::{AuthProvider, DeviceClass, PageRequest, SubscriptionProvider};
use annotation_core::{
    AnalyticsEvent, AnalyticsSink, ApiContext, Clipboard, Environment, Notifier, Principal,
};
use std::sync::Arc;

/// Side-effecting services shared by every page
#[derive(Clone)]
pub struct ShellServices {
    pub clipboard: Arc<dyn Clipboard>,
    pub notifier: Arc<dyn Notifier>,
    pub analytics: Arc<dyn AnalyticsSink>,
}

/// The bootstrap shell
pub struct AppShell {
    config: ShellConfig,
    auth: Arc<dyn AuthProvider>,
    subscriptions: Arc<dyn SubscriptionProvider>,
    services: ShellServices,
}

impl AppShell {
    #[must_use]
    pub fn new(
        config: ShellConfig,
        auth: Arc<dyn AuthProvider>,
        subscriptions: Arc<dyn SubscriptionProvider>,
        services: ShellServices,
    ) -> Self {
        Self {
            config,
            auth,
            subscriptions,
            services,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Run every gate for `request` and build the page environment
    ///
    /// # Errors
    /// - `ShellError::Unauthenticated` if nobody is signed in
    /// - `ShellError::UnsupportedDevice` for mobile clients unless allowed
    /// - `ShellError::SubscriptionInactive` if enforcement is on and the
    ///   status does not grant access
    pub async fn bootstrap(&self, request: &PageRequest) -> Result<Environment, ShellError> {
        let Some(principal) = self.auth.current_principal().await else {
            tracing::warn!(path = %request.path, "bootstrap refused: not authenticated");
            return Err(ShellError::Unauthenticated);
        };

        if request.device == DeviceClass::Mobile && !self.config.allow_mobile {
            tracing::info!(path = %request.path, "redirecting mobile client");
            return Err(ShellError::UnsupportedDevice {
                redirect_to: self.config.mobile_redirect_path.clone(),
            });
        }

        if self.config.require_subscription {
            let status = self.subscriptions.status(&principal).await;
            if !status.grants_access() {
                tracing::warn!(user = %principal.user_id, ?status, "bootstrap refused: subscription");
                return Err(ShellError::SubscriptionInactive { status });
            }
        }

        self.services.analytics.track(
            AnalyticsEvent::new("page_view")
                .with_property("path", request.path.clone())
                .with_property("user_id", principal.user_id.clone()),
        );

        let api = self.fetch_context(&principal);
        tracing::debug!(user = %principal.user_id, api = %api.base_url, "page environment ready");

        Ok(Environment::new(
            principal,
            api,
            self.services.clipboard.clone(),
            self.services.notifier.clone(),
            self.services.analytics.clone(),
        )
        .with_config(self.config.editor.clone()))
    }

    fn fetch_context(&self, principal: &Principal) -> ApiContext {
        ApiContext::new(self.config.api_base_url.clone(), principal.access_token.clone())
    }
}

impl std::fmt::Debug for AppShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShell")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
