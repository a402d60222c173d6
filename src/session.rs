//! User-facing session surface: submission, transport-event handling, and the
//! carried-in initial message.

use std::sync::Arc;

use chat_transport::{ChatTransport, TransportEvent};
use tracing::{debug, info};

use crate::attach::uploader::FileUploader;
use crate::attach::validator::validate_attachments;
use crate::config::ChatConfig;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::DispatchError;
use crate::injector::{InitialMessageInjector, NavigationPayload};
use crate::queue::OutboundQueue;
use crate::request::{AttachmentRef, AttachmentWarning, OptimisticMessage, SendRequest};

/// What one transport event caused the session to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionActivity {
    /// The carried-in initial message was dispatched by this event.
    pub injected: bool,
    /// Number of buffered requests delivered by the drain this event ran.
    pub sent_from_queue: usize,
    /// Attachment warnings accumulated across everything this event sent.
    pub warnings: Vec<AttachmentWarning>,
}

/// One chat conversation's outbound pipeline.
///
/// Owns the dispatcher, the outbound queue, the optimistic echo, and the
/// one-shot initial-message injector. The host feeds it user submissions and
/// transport events; everything else is internal.
pub struct ChatSession {
    config: ChatConfig,
    transport: Arc<dyn ChatTransport>,
    dispatcher: Dispatcher,
    injector: InitialMessageInjector,
}

impl ChatSession {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        uploader: Arc<dyn FileUploader>,
        config: ChatConfig,
    ) -> Self {
        Self {
            config,
            transport: Arc::clone(&transport),
            dispatcher: Dispatcher::new(transport, uploader),
            injector: InitialMessageInjector::empty(),
        }
    }

    /// Arms the injector with a message carried in from a prior navigation.
    pub fn with_navigation_payload(mut self, payload: NavigationPayload) -> Self {
        self.injector = InitialMessageInjector::new(Some(payload));
        self
    }

    #[must_use]
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    #[must_use]
    pub fn queue(&self) -> &OutboundQueue {
        self.dispatcher.queue()
    }

    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.dispatcher.queue().len()
    }

    #[must_use]
    pub fn optimistic_message(&self) -> Option<OptimisticMessage> {
        self.dispatcher.optimistic_message()
    }

    #[must_use]
    pub fn injector_fired(&self) -> bool {
        self.injector.has_fired()
    }

    /// Validates and dispatches one user submission.
    ///
    /// Validation runs before any request exists: a rejected submission
    /// performs no I/O, enqueues nothing, and leaves the echo untouched.
    pub async fn submit(
        &self,
        content: impl Into<String>,
        attachments: Vec<AttachmentRef>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let content = content.into();

        let mut reasons = Vec::new();
        if content.trim().is_empty() && attachments.is_empty() {
            reasons.push("message is empty".to_string());
        }
        let report = validate_attachments(&attachments, &self.config.attachment_policy);
        reasons.extend(report.into_errors());
        if !reasons.is_empty() {
            return Err(DispatchError::Validation { reasons });
        }

        self.dispatcher
            .dispatch(SendRequest::new(content, attachments))
            .await
    }

    /// Reacts to one event pushed by the transport.
    ///
    /// On a ready status the injector is given first shot, then the queue
    /// drains; a confirmed user message clears the optimistic echo.
    pub async fn on_transport_event(
        &self,
        event: TransportEvent,
    ) -> Result<SessionActivity, DispatchError> {
        let mut activity = SessionActivity::default();

        match event {
            TransportEvent::StatusChanged(status) => {
                if !status.ready_to_send() {
                    return Ok(activity);
                }

                if let Some(payload) = self.injector.try_fire(&status) {
                    self.inject(payload, &mut activity).await?;
                }

                let report = self.dispatcher.drain().await?;
                activity.sent_from_queue = report.sent;
                activity.warnings.extend(report.warnings);
            }
            TransportEvent::UserMessage { .. } => {
                if self.dispatcher.clear_optimistic_echo() {
                    debug!("optimistic echo cleared by confirmed user message");
                }
            }
            TransportEvent::AgentEvent { .. } => {}
        }

        Ok(activity)
    }

    /// Dispatches the consumed navigation payload as a regular submission.
    ///
    /// The payload is already consumed at this point, so a validation failure
    /// surfaces as an error without re-arming the injector.
    async fn inject(
        &self,
        payload: NavigationPayload,
        activity: &mut SessionActivity,
    ) -> Result<(), DispatchError> {
        let content = payload.initial_message.unwrap_or_default();
        let report = validate_attachments(&payload.attachments, &self.config.attachment_policy);
        if !report.is_valid() {
            return Err(DispatchError::Validation {
                reasons: report.into_errors(),
            });
        }

        info!("dispatching carried-in initial message");
        let outcome = self
            .dispatcher
            .dispatch(SendRequest::new(content, payload.attachments))
            .await?;
        activity.injected = true;
        if let DispatchOutcome::Sent { warnings } = outcome {
            activity.warnings.extend(warnings);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("config", &self.config)
            .field("status", &self.transport.status())
            .field("queued", &self.queued_len())
            .field("injector_fired", &self.injector_fired())
            .finish()
    }
}
