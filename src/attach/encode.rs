//! Inline base64 encoding for image attachments.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::request::AttachmentRef;

/// Maps a lowercase file extension to a MIME type.
#[must_use]
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        // Audio
        "wav" => "audio/wav",
        "mp3" => "audio/mp3",
        // Videos
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        // Documents
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "json" => "application/json",
        // Unknown
        _ => "application/octet-stream",
    }
}

/// Encodes one image attachment into a `data:` URL.
///
/// Fails per-file: an error here marks the attachment's slot and never
/// aborts the rest of the batch.
pub async fn encode_inline(attachment: &AttachmentRef) -> Result<String, String> {
    if attachment.bytes.is_empty() {
        return Err("attachment is empty".to_string());
    }

    if !attachment.mime_type.starts_with("image/") {
        return Err(format!(
            "mime type '{}' is not inline-encodable",
            attachment.mime_type
        ));
    }

    let encoded = STANDARD.encode(attachment.bytes.as_ref());
    Ok(format!("data:{};base64,{encoded}", attachment.mime_type))
}
