//! The single choke point every send request passes through.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chat_transport::{ChatTransport, OutboundMessage, TransportError};
use tracing::{debug, warn};

use crate::attach::pipeline::process_attachments;
use crate::attach::uploader::FileUploader;
use crate::echo::OptimisticEcho;
use crate::error::DispatchError;
use crate::lock_unpoisoned;
use crate::queue::OutboundQueue;
use crate::request::{AttachmentWarning, OptimisticMessage, RequestId, SendRequest};

/// Lifecycle of a request id inside the dispatcher.
///
/// `Pending` means buffered in the outbound queue; `InFlight` and `Sent` both
/// reject resubmission, which is what makes delivery at-most-once under
/// re-renders and retried effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendState {
    Pending,
    InFlight,
    Sent,
}

/// How the dispatcher handled one submitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Delivered to the transport; per-attachment warnings, if any.
    Sent { warnings: Vec<AttachmentWarning> },
    /// Buffered until the transport becomes available.
    Queued,
}

/// Summary of one queue drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub sent: usize,
    pub warnings: Vec<AttachmentWarning>,
}

enum SendAttempt {
    Delivered(Vec<AttachmentWarning>),
    /// Connection dropped between the readiness check and the send; the
    /// request was not accepted and is returned for buffering.
    Disconnected(SendRequest),
}

pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    uploader: Arc<dyn FileUploader>,
    queue: OutboundQueue,
    echo: OptimisticEcho,
    states: Mutex<HashMap<RequestId, SendState>>,
    drain_lock: tokio::sync::Mutex<()>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn ChatTransport>, uploader: Arc<dyn FileUploader>) -> Self {
        Self {
            transport,
            uploader,
            queue: OutboundQueue::new(),
            echo: OptimisticEcho::new(),
            states: Mutex::new(HashMap::new()),
            drain_lock: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn queue(&self) -> &OutboundQueue {
        &self.queue
    }

    #[must_use]
    pub fn optimistic_message(&self) -> Option<OptimisticMessage> {
        self.echo.current()
    }

    /// Invalidates the optimistic echo; called when any authoritative
    /// user-sourced event arrives for the conversation.
    pub fn clear_optimistic_echo(&self) -> bool {
        self.echo.clear()
    }

    /// Routes one request: send immediately when the transport is ready,
    /// buffer otherwise. A request takes exactly one of the two paths.
    pub async fn dispatch(&self, request: SendRequest) -> Result<DispatchOutcome, DispatchError> {
        {
            let states = lock_unpoisoned(&self.states);
            if states.contains_key(&request.id) {
                return Err(DispatchError::AlreadyDispatched { id: request.id });
            }
        }

        if !self.transport.status().ready_to_send() {
            self.mark(request.id, SendState::Pending);
            self.queue.enqueue(request);
            return Ok(DispatchOutcome::Queued);
        }

        match self.send_now(request).await? {
            SendAttempt::Delivered(warnings) => Ok(DispatchOutcome::Sent { warnings }),
            SendAttempt::Disconnected(request) => {
                self.mark(request.id, SendState::Pending);
                self.queue.enqueue(request);
                Ok(DispatchOutcome::Queued)
            }
        }
    }

    /// Sends every buffered request in order, strictly sequentially: the
    /// pipeline for entry *n+1* does not start before entry *n* completed.
    ///
    /// At most one drain runs at a time; concurrent callers wait and then
    /// observe an empty queue.
    pub async fn drain(&self) -> Result<DrainReport, DispatchError> {
        let _guard = self.drain_lock.lock().await;
        let mut report = DrainReport::default();

        loop {
            if !self.transport.status().ready_to_send() {
                break;
            }
            let Some(request) = self.queue.front() else {
                break;
            };
            let id = request.id;

            match self.send_now(request).await {
                Ok(SendAttempt::Delivered(warnings)) => {
                    // Removal strictly follows the initiated send.
                    self.queue.remove(id);
                    report.sent += 1;
                    report.warnings.extend(warnings);
                }
                Ok(SendAttempt::Disconnected(request)) => {
                    // Entry stays at the head for the next reconnect.
                    self.mark(request.id, SendState::Pending);
                    break;
                }
                Err(error) => {
                    warn!(request = %id, %error, "drain halted by send failure");
                    return Err(error);
                }
            }
        }

        if report.sent > 0 {
            debug!(sent = report.sent, remaining = self.queue.len(), "queue drained");
        }

        Ok(report)
    }

    async fn send_now(&self, request: SendRequest) -> Result<SendAttempt, DispatchError> {
        {
            let mut states = lock_unpoisoned(&self.states);
            match states.get(&request.id) {
                Some(SendState::InFlight) | Some(SendState::Sent) => {
                    return Err(DispatchError::AlreadyDispatched { id: request.id });
                }
                _ => {
                    states.insert(request.id, SendState::InFlight);
                }
            }
        }

        // Echo renders immediately; attachment results follow once composed.
        self.echo.set(OptimisticMessage {
            content: request.content.clone(),
            attachment_results: Vec::new(),
            timestamp: request.created_at,
        });

        let output = process_attachments(&request, self.uploader.as_ref()).await;
        self.echo.set(OptimisticMessage {
            content: output.content.clone(),
            attachment_results: output.results.clone(),
            timestamp: request.created_at,
        });

        let message = match OutboundMessage::new(
            output.content,
            output.image_urls,
            output.file_urls,
            request.created_at,
        ) {
            Ok(message) => message,
            Err(error) => {
                self.forget(request.id);
                return Err(error.into());
            }
        };

        match self.transport.send(&message.into_envelope()) {
            Ok(()) => {
                self.mark(request.id, SendState::Sent);
                debug!(request = %request.id, "message delivered to transport");
                Ok(SendAttempt::Delivered(output.warnings))
            }
            Err(TransportError::NotConnected) => {
                debug!(request = %request.id, "connection dropped mid-send");
                Ok(SendAttempt::Disconnected(request))
            }
            Err(error) => {
                self.forget(request.id);
                Err(error.into())
            }
        }
    }

    fn mark(&self, id: RequestId, state: SendState) {
        lock_unpoisoned(&self.states).insert(id, state);
    }

    fn forget(&self, id: RequestId) {
        lock_unpoisoned(&self.states).remove(&id);
    }
}
