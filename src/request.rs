use std::fmt;
use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

/// Opaque unique token identifying one logical send request.
pub type RequestId = Uuid;

/// Conversion path an attachment takes through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Inline-encodable: embedded in the payload as a base64 data URL.
    Image,
    /// Upload-required: sent to the file-storage collaborator, referenced by URL.
    File,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::File => "file",
        }
    }

    /// Classifies a MIME type into a conversion path.
    #[must_use]
    pub fn for_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            Self::Image
        } else {
            Self::File
        }
    }
}

/// A user-supplied attachment, owned by its `SendRequest` until consumed.
///
/// The byte handle is shared, never copied: a queued request keeps the
/// payload alive until the entry is drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub kind: AttachmentKind,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl AttachmentRef {
    pub fn new(
        kind: AttachmentKind,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Creates an inline-encodable image attachment.
    pub fn image(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::new(AttachmentKind::Image, file_name, mime_type, bytes)
    }

    /// Creates an upload-required file attachment.
    pub fn file(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::new(AttachmentKind::File, file_name, mime_type, bytes)
    }

    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Converted form of one attachment inside a message payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentPayload {
    /// `data:{mime};base64,{payload}` reference embedded in the message.
    Inline(String),
    /// URL reference returned by the file-storage collaborator.
    Uploaded(String),
}

/// Outcome of converting one `AttachmentRef`; one per input, slot-aligned.
///
/// A failed conversion keeps its slot with `error` set rather than being
/// dropped, so downstream prompt composition stays aligned with user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentResult {
    pub kind: AttachmentKind,
    pub file_name: String,
    pub payload: Option<AttachmentPayload>,
    pub error: Option<String>,
}

impl AttachmentResult {
    pub fn inline(kind: AttachmentKind, file_name: impl Into<String>, data_url: String) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            payload: Some(AttachmentPayload::Inline(data_url)),
            error: None,
        }
    }

    pub fn uploaded(kind: AttachmentKind, file_name: impl Into<String>, url: String) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            payload: Some(AttachmentPayload::Uploaded(url)),
            error: None,
        }
    }

    pub fn failed(
        kind: AttachmentKind,
        file_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            payload: None,
            error: Some(reason.into()),
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// One logical outbound message; immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub id: RequestId,
    pub content: String,
    pub attachments: Vec<AttachmentRef>,
    pub created_at: OffsetDateTime,
}

impl SendRequest {
    pub fn new(content: impl Into<String>, attachments: Vec<AttachmentRef>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            attachments,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Projection of the most recently dispatched request, rendered locally
/// before the server acknowledges it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimisticMessage {
    pub content: String,
    pub attachment_results: Vec<AttachmentResult>,
    pub timestamp: OffsetDateTime,
}

/// User-visible warning for an isolated attachment failure.
///
/// Warnings never block the enclosing message; the affected slot carries the
/// same reason in its `AttachmentResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentWarning {
    ConversionFailed { file_name: String, reason: String },
    UploadSkipped { file_name: String, reason: String },
    UploadFailed { file_name: String, reason: String },
}

impl fmt::Display for AttachmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConversionFailed { file_name, reason } => {
                write!(f, "failed to encode {file_name}: {reason}")
            }
            Self::UploadSkipped { file_name, reason } => {
                write!(f, "{file_name} was skipped by the upload service: {reason}")
            }
            Self::UploadFailed { file_name, reason } => {
                write!(f, "failed to upload {file_name}: {reason}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_classification_routes_images_inline() {
        assert_eq!(AttachmentKind::for_mime("image/png"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::for_mime("image/webp"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::for_mime("text/plain"), AttachmentKind::File);
        assert_eq!(
            AttachmentKind::for_mime("application/pdf"),
            AttachmentKind::File
        );
    }

    #[test]
    fn attachment_bytes_are_shared_not_copied() {
        let attachment = AttachmentRef::file("notes.txt", "text/plain", b"shared".to_vec());
        let clone = attachment.clone();

        assert_eq!(Arc::strong_count(&attachment.bytes), 2);
        assert_eq!(clone.size_bytes(), 6);
    }

    #[test]
    fn send_requests_get_unique_ids() {
        let first = SendRequest::new("one", Vec::new());
        let second = SendRequest::new("two", Vec::new());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn failed_result_keeps_its_slot_metadata() {
        let result = AttachmentResult::failed(AttachmentKind::Image, "pic.png", "decode error");
        assert!(result.is_failed());
        assert_eq!(result.file_name, "pic.png");
        assert_eq!(result.payload, None);
    }

    #[test]
    fn warning_messages_name_the_file_and_reason() {
        let warning = AttachmentWarning::UploadSkipped {
            file_name: "big.iso".to_string(),
            reason: "exceeds server size limit".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "big.iso was skipped by the upload service: exceeds server size limit"
        );
    }
}
