//! Minimal transport-agnostic contract for the realtime agent connection.
//!
//! This crate intentionally defines only the connection-state surface, the
//! outbound wire shape, and the send interface the dispatch pipeline consumes.
//! It excludes protocol details (handshake, framing, auth) and any buffering
//! or retry concerns, which belong to the consumer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Connectivity of the realtime connection, owned by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "CONNECTING" => Self::Connecting,
            "CONNECTED" => Self::Connected,
            "DISCONNECTED" => Self::Disconnected,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
            Self::Disconnected => "DISCONNECTED",
        }
    }
}

/// Read-only snapshot of transport readiness.
///
/// `loading_messages` is true while the transport replays conversation
/// history; sending during replay would interleave new and replayed content,
/// so consumers must treat it as not-ready even when connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportStatus {
    pub connection: ConnectionState,
    pub loading_messages: bool,
}

impl TransportStatus {
    #[must_use]
    pub fn new(connection: ConnectionState, loading_messages: bool) -> Self {
        Self {
            connection,
            loading_messages,
        }
    }

    /// True when the transport will accept a send right now.
    #[must_use]
    pub fn ready_to_send(&self) -> bool {
        self.connection == ConnectionState::Connected && !self.loading_messages
    }
}

impl Default for TransportStatus {
    fn default() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            loading_messages: false,
        }
    }
}

/// Canonical outbound chat message arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub content: String,
    pub image_urls: Vec<String>,
    pub file_urls: Vec<String>,
    /// RFC3339 creation timestamp of the originating request.
    pub timestamp: String,
}

impl OutboundMessage {
    pub fn new(
        content: impl Into<String>,
        image_urls: Vec<String>,
        file_urls: Vec<String>,
        created_at: OffsetDateTime,
    ) -> Result<Self, TransportError> {
        let timestamp = created_at
            .format(&Rfc3339)
            .map_err(|error| TransportError::Serialize(error.to_string()))?;
        Ok(Self {
            content: content.into(),
            image_urls,
            file_urls,
            timestamp,
        })
    }

    /// Wraps the arguments in the wire envelope expected by the runtime.
    #[must_use]
    pub fn into_envelope(self) -> MessageEnvelope {
        MessageEnvelope {
            action: MESSAGE_ACTION.to_string(),
            args: self,
        }
    }
}

/// Action identifier carried by every outbound chat message.
pub const MESSAGE_ACTION: &str = "message";

/// Wire envelope: `{ "action": "message", "args": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub action: String,
    pub args: OutboundMessage,
}

/// Event pushed by the transport collaborator toward the session.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Connection or replay state changed.
    StatusChanged(TransportStatus),
    /// Server confirmed a user-sourced message for the active conversation.
    ///
    /// This is the authoritative signal that invalidates any optimistic
    /// local echo, regardless of which user message it confirms.
    UserMessage { content: String, timestamp: String },
    /// Any other agent-runtime event, passed through untouched.
    AgentEvent { payload: Value },
}

/// Error surfaced by a transport `send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection is not currently established; the message was not
    /// accepted and may safely be retried once connected.
    NotConnected,
    /// The connection was permanently closed by the peer.
    Closed(String),
    /// The message could not be serialized into the wire format.
    Serialize(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "transport is not connected"),
            Self::Closed(reason) => write!(f, "transport closed: {reason}"),
            Self::Serialize(message) => write!(f, "message serialization failed: {message}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Send/state interface consumed by the dispatch pipeline.
///
/// Callers must not invoke `send` unless `status().ready_to_send()` holds;
/// implementations reject such calls with [`TransportError::NotConnected`]
/// rather than buffering, since buffering is the caller's responsibility.
pub trait ChatTransport: Send + Sync + 'static {
    /// Returns the current connectivity snapshot.
    fn status(&self) -> TransportStatus;

    /// Hands one message envelope to the underlying connection.
    fn send(&self, message: &MessageEnvelope) -> Result<(), TransportError>;
}
