//! Seams to the rest of the credential manager. The broker only sees these
//! traits; the record store, policy engine, trigger system and GUI live
//! elsewhere.

use crate::events::EventKind;

/// The secret record a copy was taken from.
pub trait SecretRecord {
    /// Update last-access time; `modified` also bumps the modification time.
    fn touch(&self, modified: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CopyToClipboard,
}

pub trait PolicyGate: Send + Sync {
    fn try_authorize(&self, capability: Capability) -> bool;
}

/// Permits everything.
pub struct AllowAll;

impl PolicyGate for AllowAll {
    fn try_authorize(&self, _capability: Capability) -> bool {
        true
    }
}

pub trait EventSink: Send + Sync {
    fn raise_event(&self, kind: EventKind, description: &str);
}

/// Drops every event.
pub struct NullEvents;

impl EventSink for NullEvents {
    fn raise_event(&self, _kind: EventKind, _description: &str) {}
}

/// Expands field references and placeholders in copied text.
pub trait PlaceholderCompiler: Send + Sync {
    fn compile(&self, text: &str, record: Option<&dyn SecretRecord>) -> String;
}

/// Copies text as given.
pub struct Verbatim;

impl PlaceholderCompiler for Verbatim {
    fn compile(&self, text: &str, _record: Option<&dyn SecretRecord>) -> String {
        text.to_string()
    }
}

/// The window a copy was triggered from.
pub trait HostWindow {
    fn lose_focus(&self);
    fn minimize(&self);
    /// Placeholder expansion may have touched the record store.
    fn refresh(&self);
}

impl<F> PolicyGate for F
where
    F: Fn(Capability) -> bool + Send + Sync,
{
    fn try_authorize(&self, capability: Capability) -> bool {
        self(capability)
    }
}
