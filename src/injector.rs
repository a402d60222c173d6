//! One-shot bridge for a message carried in from a prior navigation.

use std::sync::Mutex;

use chat_transport::TransportStatus;
use tracing::debug;

use crate::lock_unpoisoned;
use crate::request::AttachmentRef;

/// Payload delivered once via page-navigation state.
///
/// Consumed on firing so a re-render or refresh cannot resend it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationPayload {
    pub initial_message: Option<String>,
    pub attachments: Vec<AttachmentRef>,
    pub mode: Option<String>,
    pub framework: Option<String>,
}

impl NavigationPayload {
    pub fn new(initial_message: impl Into<String>) -> Self {
        Self {
            initial_message: Some(initial_message.into()),
            ..Self::default()
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<AttachmentRef>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    #[must_use]
    pub fn has_initial_message(&self) -> bool {
        self.initial_message
            .as_deref()
            .is_some_and(|message| !message.trim().is_empty())
    }
}

/// `Pending -> Fired` is the only allowed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InjectorState {
    Pending,
    Fired,
}

#[derive(Debug)]
struct InjectorInner {
    state: InjectorState,
    payload: Option<NavigationPayload>,
}

/// Fires the carried-in message at most once per session, no matter how many
/// times the triggering conditions become true.
#[derive(Debug)]
pub struct InitialMessageInjector {
    inner: Mutex<InjectorInner>,
}

impl InitialMessageInjector {
    #[must_use]
    pub fn new(payload: Option<NavigationPayload>) -> Self {
        Self {
            inner: Mutex::new(InjectorInner {
                state: InjectorState::Pending,
                payload,
            }),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Attempts the `Pending -> Fired` transition.
    ///
    /// Returns the consumed payload exactly once, and only when an initial
    /// message exists and the transport is ready. A payload without an
    /// initial message never fires.
    pub fn try_fire(&self, status: &TransportStatus) -> Option<NavigationPayload> {
        let mut inner = lock_unpoisoned(&self.inner);
        if inner.state == InjectorState::Fired {
            return None;
        }

        let has_message = inner
            .payload
            .as_ref()
            .is_some_and(NavigationPayload::has_initial_message);
        if !has_message || !status.ready_to_send() {
            return None;
        }

        inner.state = InjectorState::Fired;
        let payload = inner.payload.take();
        debug!("initial message injector fired");
        payload
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        lock_unpoisoned(&self.inner).state == InjectorState::Fired
    }
}
