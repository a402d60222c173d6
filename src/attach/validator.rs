//! Pure, synchronous checks on a candidate attachment set.
//!
//! Runs before any conversion or upload work, so an invalid set fails fast
//! with no partial side effects.

use crate::config::AttachmentPolicy;
use crate::request::AttachmentRef;

/// Outcome of validating one candidate attachment set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Checks count, per-file size, aggregate size, and kind allow-list.
///
/// Every violation is reported; the caller presents them all at once instead
/// of making the user fix one problem per attempt.
pub fn validate_attachments(
    attachments: &[AttachmentRef],
    policy: &AttachmentPolicy,
) -> ValidationReport {
    let mut errors = Vec::new();

    if attachments.len() > policy.max_count {
        errors.push(format!(
            "too many attachments: {} exceeds the limit of {}",
            attachments.len(),
            policy.max_count
        ));
    }

    let mut total_bytes = 0usize;
    for attachment in attachments {
        total_bytes = total_bytes.saturating_add(attachment.size_bytes());

        if attachment.size_bytes() > policy.max_file_bytes {
            errors.push(format!(
                "{} is {} bytes, over the per-file limit of {} bytes",
                attachment.file_name,
                attachment.size_bytes(),
                policy.max_file_bytes
            ));
        }

        if !policy.allows_kind(attachment.kind) {
            errors.push(format!(
                "{} attachments are not allowed here ({})",
                attachment.kind.as_str(),
                attachment.file_name
            ));
        }
    }

    if total_bytes > policy.max_total_bytes {
        errors.push(format!(
            "attachments total {} bytes, over the combined limit of {} bytes",
            total_bytes, policy.max_total_bytes
        ));
    }

    ValidationReport { errors }
}
