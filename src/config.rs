use crate::request::AttachmentKind;

/// Default attachment count limit per message.
pub const DEFAULT_MAX_ATTACHMENTS: usize = 10;
/// Default per-file size limit.
pub const DEFAULT_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
/// Default aggregate size limit per message.
pub const DEFAULT_MAX_TOTAL_BYTES: usize = 50 * 1024 * 1024;

/// Limits applied to a candidate attachment set before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPolicy {
    pub max_count: usize,
    pub max_file_bytes: usize,
    pub max_total_bytes: usize,
    /// Kind allow-list; `None` permits every kind. Hosts set this from their
    /// security flag to restrict uploads to inline-encodable images.
    pub allowed_kinds: Option<Vec<AttachmentKind>>,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_ATTACHMENTS,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            allowed_kinds: None,
        }
    }
}

impl AttachmentPolicy {
    #[must_use]
    pub fn allows_kind(&self, kind: AttachmentKind) -> bool {
        match &self.allowed_kinds {
            Some(kinds) => kinds.contains(&kind),
            None => true,
        }
    }
}

/// Session configuration for the dispatch pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatConfig {
    pub attachment_policy: AttachmentPolicy,
}

impl ChatConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attachment_policy(mut self, policy: AttachmentPolicy) -> Self {
        self.attachment_policy = policy;
        self
    }

    pub fn with_max_attachments(mut self, max_count: usize) -> Self {
        self.attachment_policy.max_count = max_count;
        self
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.attachment_policy.max_file_bytes = max_file_bytes;
        self
    }

    pub fn with_max_total_bytes(mut self, max_total_bytes: usize) -> Self {
        self.attachment_policy.max_total_bytes = max_total_bytes;
        self
    }

    pub fn with_allowed_kinds(mut self, kinds: Vec<AttachmentKind>) -> Self {
        self.attachment_policy.allowed_kinds = Some(kinds);
        self
    }
}
