//! Deterministic mock implementation of the shared `chat_transport` contract.
//!
//! This crate contains no socket/protocol logic and is intended for local
//! development and contract-level integration testing. Tests script the
//! connection state directly and observe every envelope handed to `send`.

use std::sync::{Mutex, MutexGuard};

use chat_transport::{
    ChatTransport, ConnectionState, MessageEnvelope, TransportError, TransportStatus,
};

/// Scripted transport that records sends and exposes settable status.
#[derive(Debug, Default)]
pub struct MockTransport {
    status: Mutex<TransportStatus>,
    sent: Mutex<Vec<MessageEnvelope>>,
    fail_next: Mutex<Option<TransportError>>,
}

impl MockTransport {
    /// Creates a disconnected mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock transport that is already connected and idle.
    #[must_use]
    pub fn connected() -> Self {
        let transport = Self::default();
        transport.set_connection(ConnectionState::Connected);
        transport
    }

    pub fn set_connection(&self, connection: ConnectionState) {
        lock_unpoisoned(&self.status).connection = connection;
    }

    pub fn set_loading_messages(&self, loading: bool) {
        lock_unpoisoned(&self.status).loading_messages = loading;
    }

    /// Forces the next `send` to fail with `error`, regardless of status.
    pub fn fail_next_send(&self, error: TransportError) {
        *lock_unpoisoned(&self.fail_next) = Some(error);
    }

    /// Returns every envelope accepted so far, in send order.
    #[must_use]
    pub fn sent(&self) -> Vec<MessageEnvelope> {
        lock_unpoisoned(&self.sent).clone()
    }

    #[must_use]
    pub fn sent_len(&self) -> usize {
        lock_unpoisoned(&self.sent).len()
    }
}

impl ChatTransport for MockTransport {
    fn status(&self) -> TransportStatus {
        *lock_unpoisoned(&self.status)
    }

    fn send(&self, message: &MessageEnvelope) -> Result<(), TransportError> {
        if let Some(error) = lock_unpoisoned(&self.fail_next).take() {
            return Err(error);
        }

        if lock_unpoisoned(&self.status).connection != ConnectionState::Connected {
            return Err(TransportError::NotConnected);
        }

        lock_unpoisoned(&self.sent).push(message.clone());
        Ok(())
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
