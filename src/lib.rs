//! Outbound message pipeline for an AI coding-agent chat client.
//!
//! Everything a user sends travels one path: validation, an immutable
//! [`SendRequest`], then either an immediate send or the FIFO outbound queue,
//! depending only on transport readiness. Attachments are converted on the
//! way out (images inline as data URLs, files through a batched upload), the
//! message renders locally as a single-slot optimistic echo, and a message
//! carried in from a prior navigation fires at most once per session.
//!
//! The transport itself lives behind the [`ChatTransport`] trait from
//! `chat_transport`; this crate never reconnects, retries, or buffers on its
//! behalf.

use std::sync::{Mutex, MutexGuard};

pub mod attach;
pub mod config;
pub mod dispatcher;
pub mod echo;
pub mod error;
pub mod injector;
pub mod queue;
pub mod request;
pub mod session;

pub use attach::pipeline::{process_attachments, PipelineOutput, ATTACHED_FILES_LABEL};
pub use attach::uploader::{FileUploader, UploadError};
pub use attach::validator::{validate_attachments, ValidationReport};
pub use chat_transport::{
    ChatTransport, ConnectionState, MessageEnvelope, OutboundMessage, TransportError,
    TransportEvent, TransportStatus,
};
pub use config::{AttachmentPolicy, ChatConfig};
pub use dispatcher::{DispatchOutcome, Dispatcher, DrainReport};
pub use error::DispatchError;
pub use injector::{InitialMessageInjector, NavigationPayload};
pub use queue::OutboundQueue;
pub use request::{
    AttachmentKind, AttachmentPayload, AttachmentRef, AttachmentResult, AttachmentWarning,
    OptimisticMessage, RequestId, SendRequest,
};
pub use session::{ChatSession, SessionActivity};

/// Locks a mutex, recovering the guard if a previous holder panicked.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
