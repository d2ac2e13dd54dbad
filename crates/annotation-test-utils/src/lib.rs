//! Testing utilities for the annotation workspace
//!
//! Recording and scripted fakes for every collaborator seam, plus a
//! `TestBed` bundling them into an `Environment`, and a `LogCapture` layer
//! for asserting on emitted log events.

#![allow(missing_docs)]

use annotation_core::{
    AnalyticsEvent, AnalyticsSink, AnnotationHost, ApiContext, Clipboard, ClipboardError,
    EditorConfig, Environment, Notification, NotificationVariant, Notifier, Principal, SaveError,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

/// Host that records saves and cancels
///
/// Saves succeed unless a failure was queued with `fail_next`. A gated host
/// holds every save in flight until `release` is called, so tests can
/// observe the saving state.
#[derive(Debug, Default)]
pub struct RecordingHost {
    saved: Mutex<Vec<String>>,
    outcomes: Mutex<VecDeque<Result<(), SaveError>>>,
    cancels: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    started: Notify,
    gate: Option<Semaphore>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    /// Queue a failure for the next save
    #[must_use]
    pub fn fail_next(self, error: SaveError) -> Self {
        self.outcomes.lock().push_back(Err(error));
        self
    }

    /// Queue a failure on a shared host
    pub fn push_failure(&self, error: SaveError) {
        self.outcomes.lock().push_back(Err(error));
    }

    /// Let one held save settle
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Wait until a save has reached the host
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Texts handed to `save`, in call order (including failed ones)
    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().clone()
    }

    pub fn save_calls(&self) -> usize {
        self.saved.lock().len()
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    /// Highest number of saves observed in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnnotationHost for RecordingHost {
    async fn save(&self, description: &str) -> Result<(), SaveError> {
        self.saved.lock().push(description.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.outcomes.lock().pop_front().unwrap_or(Ok(()))
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

/// Clipboard that records writes and answers from a script
#[derive(Debug, Default)]
pub struct ScriptedClipboard {
    writes: Mutex<Vec<String>>,
    failure: Option<ClipboardError>,
}

impl ScriptedClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard whose every write fails with `error`
    pub fn failing(error: ClipboardError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Texts that were successfully written
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl Clipboard for ScriptedClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.writes.lock().push(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    pub fn count(&self, variant: NotificationVariant) -> usize {
        self.sent.lock().iter().filter(|n| n.variant == variant).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.sent.lock().push(notification);
    }
}

#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.name.clone()).collect()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        self.events.lock().push(event);
    }
}

/// One log event seen by `LogCapture`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    /// Name of the innermost span the event was emitted in
    pub span: Option<String>,
}

/// Layer that records every event with its enclosing span
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install as this thread's default subscriber until the guard drops
    ///
    /// Works across `.await` on a current-thread runtime.
    #[must_use]
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    pub fn find(&self, message: &str) -> Option<CapturedEvent> {
        self.events.lock().iter().find(|e| e.message == message).cloned()
    }
}

impl<S> Layer<S> for LogCapture
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        let span = ctx.event_span(event).map(|span| span.name().to_string());
        self.events.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            span,
        });
    }
}

struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        }
    }
}

pub fn test_principal() -> Principal {
    Principal::new("user_1", "test-token").with_email("ops@example.com")
}

pub fn environment_with(
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    analytics: Arc<dyn AnalyticsSink>,
) -> Environment {
    Environment::new(
        test_principal(),
        ApiContext::new("http://localhost/api/v1", "test-token"),
        clipboard,
        notifier,
        analytics,
    )
}

/// All fakes wired together
#[derive(Debug, Clone)]
pub struct TestBed {
    pub host: Arc<RecordingHost>,
    pub clipboard: Arc<ScriptedClipboard>,
    pub notifier: Arc<RecordingNotifier>,
    pub analytics: Arc<RecordingAnalytics>,
    pub config: EditorConfig,
}

impl TestBed {
    pub fn new() -> Self {
        Self::with_host(RecordingHost::new())
    }

    pub fn with_host(host: RecordingHost) -> Self {
        Self {
            host: Arc::new(host),
            clipboard: Arc::new(ScriptedClipboard::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            analytics: Arc::new(RecordingAnalytics::new()),
            config: EditorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_clipboard(mut self, clipboard: ScriptedClipboard) -> Self {
        self.clipboard = Arc::new(clipboard);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn environment(&self) -> Environment {
        environment_with(
            self.clipboard.clone(),
            self.notifier.clone(),
            self.analytics.clone(),
        )
        .with_config(self.config.clone())
    }
}

impl Default for TestBed {
    fn default() -> Self {
        Self::new()
    }
}
