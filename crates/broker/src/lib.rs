pub mod collaborators;
pub mod events;
pub mod broker;
pub mod writer;
pub mod tracker;

pub use collaborators::*;
pub use events::{BrokerEvent, ChannelEventSink, EventKind};
pub use broker::{ClipboardBroker, OwnershipState};
pub use writer::CopyContext;
pub use tracker::Ownership;
pub use passclip_clipboard::ClearOutcome;
