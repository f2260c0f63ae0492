use crate::collaborators::{AllowAll, EventSink, NullEvents, PlaceholderCompiler, PolicyGate, Verbatim};
use passclip_clipboard::{ClearOutcome, ClipboardProvider, NativeClearer};
use passclip_core::{AppConfig, Fingerprint, FingerprintEngine, MainWindowConfig, SecurityConfig};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What the broker believes it last wrote.
///
/// `fingerprint` is set only while the broker's own most recent write has
/// not been cleared. It is a belief, checked against the live clipboard
/// before any clearing decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipState {
    pub fingerprint: Option<Fingerprint>,
    pub format: Option<String>,
}

impl OwnershipState {
    pub fn is_owned(&self) -> bool {
        self.fingerprint.is_some()
    }

    pub(crate) fn record(&mut self, fingerprint: Fingerprint, format: Option<String>) {
        self.fingerprint = Some(fingerprint);
        self.format = format;
    }

    pub(crate) fn reset(&mut self) {
        self.fingerprint = None;
        self.format = None;
    }
}

/// Places secrets on the clipboard and removes them again once it can prove
/// the clipboard still holds what it wrote.
///
/// Construct one per process and share it by reference or `Arc`. Every
/// operation holds the state lock for its whole clipboard sequence, so a
/// copy never interleaves with an ownership check.
pub struct ClipboardBroker {
    pub(crate) clearer: NativeClearer,
    pub(crate) engine: FingerprintEngine,
    pub(crate) state: Mutex<OwnershipState>,
    pub(crate) window: MainWindowConfig,
    pub(crate) security: SecurityConfig,
    pub(crate) policy: Box<dyn PolicyGate>,
    pub(crate) events: Box<dyn EventSink>,
    pub(crate) compiler: Box<dyn PlaceholderCompiler>,
}

impl ClipboardBroker {
    /// Probes the provider's clear strategy once, here.
    pub fn new(provider: Arc<dyn ClipboardProvider>, config: &AppConfig) -> Self {
        let clearer = NativeClearer::new(provider);
        tracing::info!(strategy = clearer.strategy_name(), "Clipboard broker ready");
        Self {
            clearer,
            engine: FingerprintEngine,
            state: Mutex::new(OwnershipState::default()),
            window: config.main_window.clone(),
            security: config.security.clone(),
            policy: Box::new(AllowAll),
            events: Box::new(NullEvents),
            compiler: Box::new(Verbatim),
        }
    }

    pub fn with_policy(mut self, policy: impl PolicyGate + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn with_events(mut self, events: impl EventSink + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    pub fn with_compiler(mut self, compiler: impl PlaceholderCompiler + 'static) -> Self {
        self.compiler = Box::new(compiler);
        self
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, OwnershipState> {
        // The state is plain data, a panic elsewhere cannot leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current ownership belief.
    pub fn ownership_state(&self) -> OwnershipState {
        self.state().clone()
    }

    /// Empties the clipboard whoever wrote it and forgets the last write.
    pub fn clear(&self) -> ClearOutcome {
        let mut state = self.state();
        state.reset();
        let outcome = self.clearer.clear();
        tracing::debug!(?outcome, "Clipboard cleared");
        outcome
    }

    pub fn provider(&self) -> &Arc<dyn ClipboardProvider> {
        self.clearer.provider()
    }
}
