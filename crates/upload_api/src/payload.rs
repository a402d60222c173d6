use serde::{Deserialize, Serialize};

/// One file handed to the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadPart {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Per-file outcome reported by the upload endpoint.
///
/// Result order is not guaranteed to match input order; consumers must match
/// entries by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub uploaded_files: Vec<String>,
    #[serde(default)]
    pub skipped_files: Vec<SkippedFile>,
}

/// A file the server declined, with its server-supplied reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}
