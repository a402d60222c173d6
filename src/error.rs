use chat_transport::TransportError;
use thiserror::Error;

use crate::request::RequestId;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Attachment validation failed before any conversion or upload started;
    /// no `SendRequest` was created for this attempt.
    #[error("attachment validation failed: {}", .reasons.join("; "))]
    Validation { reasons: Vec<String> },

    /// The request was already dispatched (queued, in flight, or sent) and
    /// must not be submitted again.
    #[error("request {id} was already dispatched")]
    AlreadyDispatched { id: RequestId },

    /// The transport rejected the message for a non-connectivity reason.
    ///
    /// Connectivity failures never surface here; they re-enqueue the request
    /// through the normal not-ready path.
    #[error("transport rejected message: {0}")]
    Transport(#[from] TransportError),
}
