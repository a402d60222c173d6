//! Session-lifetime FIFO buffer for messages authored while the transport is
//! unavailable.

use std::collections::VecDeque;
use std::sync::Mutex;

use time::OffsetDateTime;
use tracing::debug;

use crate::lock_unpoisoned;
use crate::request::{RequestId, SendRequest};

/// One buffered request awaiting transport availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedEntry {
    pub request: SendRequest,
    pub enqueued_at: OffsetDateTime,
}

/// Ordered buffer of not-yet-sent requests.
///
/// Entries hold the request's attachment handles strongly, so payloads stay
/// alive until drained. An entry is removed exactly once, and only after a
/// send attempt for it was initiated.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    entries: Mutex<VecDeque<QueuedEntry>>,
}

impl OutboundQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, request: SendRequest) {
        let mut entries = lock_unpoisoned(&self.entries);
        debug!(request = %request.id, depth = entries.len() + 1, "request enqueued");
        entries.push_back(QueuedEntry {
            request,
            enqueued_at: OffsetDateTime::now_utc(),
        });
    }

    /// Non-destructive peek at the oldest buffered request.
    #[must_use]
    pub fn front(&self) -> Option<SendRequest> {
        lock_unpoisoned(&self.entries)
            .front()
            .map(|entry| entry.request.clone())
    }

    /// Ordered snapshot of every buffered request, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<SendRequest> {
        lock_unpoisoned(&self.entries)
            .iter()
            .map(|entry| entry.request.clone())
            .collect()
    }

    /// Removes the entry for `id`; returns whether anything was removed.
    pub fn remove(&self, id: RequestId) -> bool {
        let mut entries = lock_unpoisoned(&self.entries);
        let before = entries.len();
        entries.retain(|entry| entry.request.id != id);
        before != entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock_unpoisoned(&self.entries).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock_unpoisoned(&self.entries).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::request::AttachmentRef;

    #[test]
    fn preserves_creation_order() {
        let queue = OutboundQueue::new();
        let first = SendRequest::new("first", Vec::new());
        let second = SendRequest::new("second", Vec::new());
        queue.enqueue(first.clone());
        queue.enqueue(second.clone());

        let pending = queue.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, first.id);
        assert_eq!(pending[1].id, second.id);
        assert_eq!(queue.front().map(|request| request.id), Some(first.id));
    }

    #[test]
    fn front_is_non_destructive() {
        let queue = OutboundQueue::new();
        queue.enqueue(SendRequest::new("peeked", Vec::new()));

        assert!(queue.front().is_some());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn remove_targets_exactly_one_entry() {
        let queue = OutboundQueue::new();
        let kept = SendRequest::new("kept", Vec::new());
        let removed = SendRequest::new("removed", Vec::new());
        queue.enqueue(kept.clone());
        queue.enqueue(removed.clone());

        assert!(queue.remove(removed.id));
        assert!(!queue.remove(removed.id));
        assert_eq!(queue.pending().len(), 1);
        assert_eq!(queue.front().map(|request| request.id), Some(kept.id));
    }

    #[test]
    fn queued_entries_keep_attachment_payloads_alive() {
        let attachment = AttachmentRef::file("held.bin", "application/octet-stream", vec![1, 2]);
        let handle = Arc::clone(&attachment.bytes);

        let queue = OutboundQueue::new();
        queue.enqueue(SendRequest::new("with file", vec![attachment]));

        // One count here, one inside the queued request.
        assert_eq!(Arc::strong_count(&handle), 2);
    }
}
