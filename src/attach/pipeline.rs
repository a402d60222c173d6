//! Turns a validated attachment set into a slot-aligned result list and the
//! composed message payload parts.
//!
//! Image-kind refs are inline-encoded concurrently and fail per-file;
//! file-kind refs go to the upload collaborator as one batch. Failures are
//! isolated to their slot and surfaced as warnings; the pipeline never
//! retries and never aborts the enclosing message.

use futures_util::future::join_all;
use tracing::{debug, warn};
use upload_api::UploadPart;

use crate::attach::encode::encode_inline;
use crate::attach::uploader::{match_by_file_name, FileUploader, UploadMatch};
use crate::request::{
    AttachmentKind, AttachmentPayload, AttachmentResult, AttachmentWarning, SendRequest,
};

/// Label introducing the uploaded-file suffix woven into outgoing content.
pub const ATTACHED_FILES_LABEL: &str = "Attached files:";

/// Composed payload parts for one send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Original content plus the deterministic uploaded-file suffix.
    pub content: String,
    /// One result per input attachment, order-preserving.
    pub results: Vec<AttachmentResult>,
    /// Inline data URLs for successfully encoded images, in slot order.
    pub image_urls: Vec<String>,
    /// Upload references for accepted files, in slot order.
    pub file_urls: Vec<String>,
    /// Per-attachment failures for user display.
    pub warnings: Vec<AttachmentWarning>,
}

/// Runs both conversion paths and merges their outputs.
///
/// The composed output is only assembled once every conversion has resolved,
/// success or failure; partial results are never returned.
pub async fn process_attachments(
    request: &SendRequest,
    uploader: &dyn FileUploader,
) -> PipelineOutput {
    let mut results: Vec<AttachmentResult> = request
        .attachments
        .iter()
        .map(|attachment| {
            AttachmentResult::failed(attachment.kind, attachment.file_name.clone(), "not processed")
        })
        .collect();
    let mut warnings = Vec::new();

    let image_jobs: Vec<_> = request
        .attachments
        .iter()
        .enumerate()
        .filter(|(_, attachment)| attachment.kind == AttachmentKind::Image)
        .map(|(index, attachment)| async move { (index, encode_inline(attachment).await) })
        .collect();

    for (index, outcome) in join_all(image_jobs).await {
        let attachment = &request.attachments[index];
        match outcome {
            Ok(data_url) => {
                results[index] =
                    AttachmentResult::inline(attachment.kind, attachment.file_name.clone(), data_url);
            }
            Err(reason) => {
                warn!(file = %attachment.file_name, %reason, "image conversion failed");
                warnings.push(AttachmentWarning::ConversionFailed {
                    file_name: attachment.file_name.clone(),
                    reason: reason.clone(),
                });
                results[index] =
                    AttachmentResult::failed(attachment.kind, attachment.file_name.clone(), reason);
            }
        }
    }

    let upload_indices: Vec<usize> = request
        .attachments
        .iter()
        .enumerate()
        .filter(|(_, attachment)| attachment.kind == AttachmentKind::File)
        .map(|(index, _)| index)
        .collect();

    if !upload_indices.is_empty() {
        let parts = upload_indices
            .iter()
            .map(|&index| {
                let attachment = &request.attachments[index];
                UploadPart::new(
                    attachment.file_name.clone(),
                    attachment.mime_type.clone(),
                    attachment.bytes.to_vec(),
                )
            })
            .collect();

        match uploader.upload_files(parts).await {
            Ok(response) => {
                for &index in &upload_indices {
                    let attachment = &request.attachments[index];
                    match match_by_file_name(&response, &attachment.file_name) {
                        UploadMatch::Uploaded(url) => {
                            results[index] = AttachmentResult::uploaded(
                                attachment.kind,
                                attachment.file_name.clone(),
                                url.to_string(),
                            );
                        }
                        UploadMatch::Skipped(reason) => {
                            warnings.push(AttachmentWarning::UploadSkipped {
                                file_name: attachment.file_name.clone(),
                                reason: reason.to_string(),
                            });
                            results[index] = AttachmentResult::failed(
                                attachment.kind,
                                attachment.file_name.clone(),
                                reason,
                            );
                        }
                        UploadMatch::Missing => {
                            let reason = "upload service returned no result for this file";
                            warnings.push(AttachmentWarning::UploadSkipped {
                                file_name: attachment.file_name.clone(),
                                reason: reason.to_string(),
                            });
                            results[index] = AttachmentResult::failed(
                                attachment.kind,
                                attachment.file_name.clone(),
                                reason,
                            );
                        }
                    }
                }
            }
            Err(error) => {
                warn!(%error, files = upload_indices.len(), "file upload batch failed");
                for &index in &upload_indices {
                    let attachment = &request.attachments[index];
                    warnings.push(AttachmentWarning::UploadFailed {
                        file_name: attachment.file_name.clone(),
                        reason: error.message().to_string(),
                    });
                    results[index] = AttachmentResult::failed(
                        attachment.kind,
                        attachment.file_name.clone(),
                        error.message(),
                    );
                }
            }
        }
    }

    let uploaded: Vec<(&str, &str)> = results
        .iter()
        .filter_map(|result| match &result.payload {
            Some(AttachmentPayload::Uploaded(url)) => {
                Some((result.file_name.as_str(), url.as_str()))
            }
            _ => None,
        })
        .collect();

    let mut content = request.content.clone();
    if !uploaded.is_empty() {
        content.push_str("\n\n");
        content.push_str(ATTACHED_FILES_LABEL);
        for (file_name, url) in &uploaded {
            content.push_str(&format!("\n- {file_name}: {url}"));
        }
    }

    let image_urls: Vec<String> = results
        .iter()
        .filter_map(|result| match &result.payload {
            Some(AttachmentPayload::Inline(data_url)) => Some(data_url.clone()),
            _ => None,
        })
        .collect();
    let file_urls: Vec<String> = uploaded.iter().map(|(_, url)| (*url).to_string()).collect();

    debug!(
        request = %request.id,
        images = image_urls.len(),
        files = file_urls.len(),
        warnings = warnings.len(),
        "attachment pipeline resolved"
    );

    PipelineOutput {
        content,
        results,
        image_urls,
        file_urls,
        warnings,
    }
}
