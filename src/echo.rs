//! Single-slot store for the optimistic local echo.

use std::sync::Mutex;

use crate::lock_unpoisoned;
use crate::request::OptimisticMessage;

/// Holds the most recently dispatched user message until the server confirms
/// any user-sourced message for the conversation.
///
/// Single-writer (the dispatcher) / multi-reader (the render layer).
/// Optimism is deliberately one slot deep, not a local history.
#[derive(Debug, Default)]
pub struct OptimisticEcho {
    slot: Mutex<Option<OptimisticMessage>>,
}

impl OptimisticEcho {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, message: OptimisticMessage) {
        *lock_unpoisoned(&self.slot) = Some(message);
    }

    /// Clears the slot; returns whether a message was present.
    pub fn clear(&self) -> bool {
        lock_unpoisoned(&self.slot).take().is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<OptimisticMessage> {
        lock_unpoisoned(&self.slot).clone()
    }
}
