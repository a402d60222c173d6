//! Seam between the pipeline and the file-storage collaborator.

use std::fmt;

use futures_util::future::BoxFuture;
use upload_api::{UploadClient, UploadPart, UploadResponse};

/// Error from the upload collaborator.
///
/// Terminal for the file batch of one send attempt; the pipeline performs no
/// retries, the user must re-attach and resend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadError {
    message: String,
}

impl UploadError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for UploadError {}

impl From<String> for UploadError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for UploadError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Upload interface consumed by the attachment pipeline.
///
/// One call per send attempt, covering the whole file batch. Result order is
/// not guaranteed to match input order; the pipeline matches by file name.
pub trait FileUploader: Send + Sync + 'static {
    fn upload_files<'a>(
        &'a self,
        files: Vec<UploadPart>,
    ) -> BoxFuture<'a, Result<UploadResponse, UploadError>>;
}

impl FileUploader for UploadClient {
    fn upload_files<'a>(
        &'a self,
        files: Vec<UploadPart>,
    ) -> BoxFuture<'a, Result<UploadResponse, UploadError>> {
        Box::pin(async move {
            self.upload(files)
                .await
                .map_err(|error| UploadError::new(error.to_string()))
        })
    }
}

/// Server outcome for one input file, matched by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UploadMatch<'a> {
    Uploaded(&'a str),
    Skipped(&'a str),
    Missing,
}

pub(crate) fn match_by_file_name<'a>(
    response: &'a UploadResponse,
    file_name: &str,
) -> UploadMatch<'a> {
    if let Some(url) = response
        .uploaded_files
        .iter()
        .find(|url| url_names_file(url, file_name))
    {
        return UploadMatch::Uploaded(url);
    }

    if let Some(skipped) = response
        .skipped_files
        .iter()
        .find(|skipped| skipped.name == file_name)
    {
        return UploadMatch::Skipped(&skipped.reason);
    }

    UploadMatch::Missing
}

fn url_names_file(url: &str, file_name: &str) -> bool {
    url.rsplit('/')
        .next()
        .and_then(|segment| segment.split('?').next())
        .is_some_and(|segment| segment == file_name)
}
