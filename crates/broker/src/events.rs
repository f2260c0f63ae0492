use crate::collaborators::EventSink;
use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A field of a secret record was copied.
    CopiedEntryInfo,
    /// Anything else was copied.
    CopiedData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEvent {
    pub kind: EventKind,
    pub description: String,
}

/// Forwards events to a bounded channel for the host to drain.
///
/// Uses `try_send` so the synchronous broker never blocks and can run
/// inside or outside a tokio runtime. A full or closed channel drops the
/// event.
pub struct ChannelEventSink {
    tx: Sender<BrokerEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: Sender<BrokerEvent>) -> Self {
        Self { tx }
    }

    pub fn channel(capacity: usize) -> (Self, Receiver<BrokerEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelEventSink {
    fn raise_event(&self, kind: EventKind, description: &str) {
        tracing::debug!(?kind, "Raising clipboard event");

        let event = BrokerEvent { kind, description: description.to_string() };
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(kind = ?event.kind, "Event channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Event channel closed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_reach_the_receiver() {
        let (sink, mut rx) = ChannelEventSink::channel(4);
        sink.raise_event(EventKind::CopiedData, "hello");

        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, EventKind::CopiedData);
        assert_eq!(event.description, "hello");
    }

    #[test]
    fn full_or_closed_channel_drops_silently() {
        let (sink, rx) = ChannelEventSink::channel(1);
        sink.raise_event(EventKind::CopiedData, "one");
        sink.raise_event(EventKind::CopiedData, "two");
        drop(rx);
        sink.raise_event(EventKind::CopiedData, "three");
    }
}
