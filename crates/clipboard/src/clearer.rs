//! Best-effort clipboard clearing.
//!
//! Placing an empty clipboard object through the high-level API leaves a
//! placeholder that clipboard observers report as new content. Where the
//! platform can really vacate the clipboard that path is tried first.

use crate::traits::ClipboardProvider;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The native primitive emptied the clipboard and dropped its owner.
    Vacated,
    /// The fallback placed an empty clipboard object.
    Emptied,
    /// Both paths failed; the clipboard may still hold content.
    Failed,
}

pub trait ClearStrategy: Send + Sync {
    fn clear(&self, provider: &dyn ClipboardProvider) -> ClearOutcome;
    fn name(&self) -> &'static str;
}

/// Native vacate, falling back to an empty object when any step fails.
pub struct NativeFirst;

/// Empty object only, for platforms without a native vacate.
pub struct FallbackOnly;

impl ClearStrategy for NativeFirst {
    fn clear(&self, provider: &dyn ClipboardProvider) -> ClearOutcome {
        match provider.vacate() {
            Ok(()) => ClearOutcome::Vacated,
            Err(e) => {
                log::warn!("Native clipboard clear failed, using fallback: {}", e);
                FallbackOnly.clear(provider)
            }
        }
    }

    fn name(&self) -> &'static str {
        "native-first"
    }
}

impl ClearStrategy for FallbackOnly {
    fn clear(&self, provider: &dyn ClipboardProvider) -> ClearOutcome {
        match provider.set_empty() {
            Ok(()) => ClearOutcome::Emptied,
            Err(e) => {
                log::error!("Failed to clear clipboard: {}", e);
                ClearOutcome::Failed
            }
        }
    }

    fn name(&self) -> &'static str {
        "fallback-only"
    }
}

/// Picks the strategy for `provider`. Meant to run once at startup.
pub fn select_strategy(provider: &dyn ClipboardProvider) -> Box<dyn ClearStrategy> {
    if provider.supports_native_vacate() {
        Box::new(NativeFirst)
    } else {
        log::debug!("Native clipboard vacate unsupported on this platform");
        Box::new(FallbackOnly)
    }
}

/// A provider bound to the clear strategy probed for it.
pub struct NativeClearer {
    provider: Arc<dyn ClipboardProvider>,
    strategy: Box<dyn ClearStrategy>,
}

impl NativeClearer {
    pub fn new(provider: Arc<dyn ClipboardProvider>) -> Self {
        let strategy = select_strategy(provider.as_ref());
        log::debug!("Clipboard clear strategy: {}", strategy.name());
        Self { provider, strategy }
    }

    /// Never fails; the outcome is informational.
    pub fn clear(&self) -> ClearOutcome {
        self.strategy.clear(self.provider.as_ref())
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn provider(&self) -> &Arc<dyn ClipboardProvider> {
        &self.provider
    }
}
