//! HTTP client for the file-storage collaborator.
//!
//! Uploads a batch of chat attachments in one multipart request and decodes
//! the per-file accept/skip outcome. The server does not guarantee result
//! order, so consumers must match results to inputs by file name.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;

pub use client::UploadClient;
pub use config::UploadApiConfig;
pub use error::UploadApiError;
pub use payload::{SkippedFile, UploadPart, UploadResponse};
