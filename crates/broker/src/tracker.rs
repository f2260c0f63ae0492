use crate::broker::{ClipboardBroker, OwnershipState};
use anyhow::Result;
use passclip_core::Fingerprint;

/// Result of checking the live clipboard against the last recorded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Match,
    NoRecordedWrite,
    Mismatch,
    /// The clipboard could not be read, or holds nothing comparable.
    ReadError,
}

impl ClipboardBroker {
    pub fn verify_ownership(&self) -> Ownership {
        let state = self.state();
        self.verify_locked(&state)
    }

    /// Clears the clipboard only if it provably still holds our last write.
    /// Anything else is left alone; the returned outcome is informational.
    pub fn clear_if_owner(&self) -> Ownership {
        let mut state = self.state();
        let ownership = self.verify_locked(&state);
        if ownership == Ownership::Match {
            state.reset();
            let outcome = self.clearer.clear();
            tracing::info!(?outcome, "Cleared own clipboard content");
        } else {
            tracing::debug!(?ownership, "Clipboard not cleared");
        }
        ownership
    }

    fn verify_locked(&self, state: &OwnershipState) -> Ownership {
        let Some(recorded) = state.fingerprint else {
            return Ownership::NoRecordedWrite;
        };

        let live = match self.live_fingerprint(state.format.as_deref()) {
            Ok(Some(fp)) => fp,
            Ok(None) => return Ownership::ReadError,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read clipboard for ownership check");
                return Ownership::ReadError;
            }
        };

        if recorded.matches(live.as_bytes()) {
            Ownership::Match
        } else {
            Ownership::Mismatch
        }
    }

    // Text wins when present; binary data is only looked up under the
    // format we recorded.
    fn live_fingerprint(&self, format: Option<&str>) -> Result<Option<Fingerprint>> {
        let provider = self.provider();
        if let Some(text) = provider.get_text()? {
            return Ok(Some(self.engine.digest_text(&text)));
        }
        if let Some(format) = format {
            if let Some(bytes) = provider.get_data(format)? {
                return Ok(Some(self.engine.digest(&bytes)));
            }
        }
        Ok(None)
    }
}
