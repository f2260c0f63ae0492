use crate::broker::{ClipboardBroker, OwnershipState};
use crate::collaborators::{Capability, HostWindow, SecretRecord};
use crate::events::EventKind;
use passclip_clipboard::{TransferContent, TransferObject};
use passclip_core::{Payload, ValidationError};
use std::borrow::Cow;

/// Where a copy came from.
#[derive(Clone, Copy, Default)]
pub struct CopyContext<'a> {
    /// Record the copied value belongs to.
    pub record: Option<&'a dyn SecretRecord>,
    /// Window the copy was triggered from.
    pub window: Option<&'a dyn HostWindow>,
}

impl<'a> CopyContext<'a> {
    pub fn for_record(record: &'a dyn SecretRecord) -> Self {
        Self { record: Some(record), window: None }
    }

    pub fn with_window(mut self, window: &'a dyn HostWindow) -> Self {
        self.window = Some(window);
        self
    }
}

impl ClipboardBroker {
    /// Puts `payload` on the clipboard.
    ///
    /// `sensitive` marks a copy of secret record data: it is gated by the
    /// policy, never described in events and touches the source record.
    /// Returns `Ok(false)` when policy denies the copy or the platform write
    /// fails. Once past the policy gate the clipboard is cleared first, so
    /// a failed write still leaves it empty.
    pub fn copy(&self, payload: &Payload, sensitive: bool, ctx: CopyContext<'_>) -> Result<bool, ValidationError> {
        payload.validate()?;

        if sensitive && !self.policy.try_authorize(Capability::CopyToClipboard) {
            tracing::info!("Clipboard copy denied by policy");
            return Ok(false);
        }

        let payload = match payload {
            Payload::Text(text) => Cow::Owned(Payload::Text(self.compiler.compile(text, ctx.record))),
            data => Cow::Borrowed(data),
        };

        let placed = {
            let mut state = self.state();
            self.place(&mut state, &payload)
        };
        if !placed {
            return Ok(false);
        }

        let (kind, description) = match (sensitive, payload.as_ref()) {
            (true, _) => (EventKind::CopiedEntryInfo, ""),
            (false, Payload::Text(text)) => (EventKind::CopiedData, text.as_str()),
            (false, Payload::Data { .. }) => (EventKind::CopiedData, ""),
        };
        self.events.raise_event(kind, description);

        if sensitive {
            if let Some(record) = ctx.record {
                record.touch(false);
            }
        }
        if let (Payload::Text(_), Some(window)) = (payload.as_ref(), ctx.window) {
            window.refresh();
        }

        Ok(true)
    }

    /// `copy`, then drop the host window to the back and/or minimize it as
    /// configured.
    pub fn copy_and_minimize(
        &self,
        payload: &Payload,
        sensitive: bool,
        ctx: CopyContext<'_>,
    ) -> Result<bool, ValidationError> {
        if !self.copy(payload, sensitive, ctx)? {
            return Ok(false);
        }
        if let Some(window) = ctx.window {
            if self.window.drop_to_back_after_copy {
                window.lose_focus();
            }
            if self.window.minimize_after_copy {
                window.minimize();
            }
        }
        Ok(true)
    }

    fn place(&self, state: &mut OwnershipState, payload: &Payload) -> bool {
        state.reset();
        self.clearer.clear();

        let provider = self.provider();
        let mut transfer = TransferObject::from_payload(payload);
        if self.security.use_ignore_format_marker {
            if provider.supports_ignore_marker() {
                transfer = transfer.with_ignore_marker();
            } else {
                tracing::debug!("Clipboard ignore marker unsupported, skipping");
            }
        }

        if let Err(e) = provider.set_transfer(&transfer) {
            tracing::warn!(error = %e, "Failed to write clipboard");
            return false;
        }

        // Only the marker was placed; there is no content to verify later.
        if transfer.content == TransferContent::Empty {
            tracing::debug!("Copied empty payload, nothing recorded");
            return true;
        }

        let fingerprint = self.engine.digest(payload.as_bytes());
        state.record(fingerprint, payload.format_tag().map(str::to_string));
        tracing::debug!(len = payload.as_bytes().len(), format = ?payload.format_tag(), "Copied to clipboard");
        true
    }
}
