//! Shared test collaborators for the integration suites.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use agent_chat::{FileUploader, UploadError};
use futures_util::future::BoxFuture;
use upload_api::{SkippedFile, UploadPart, UploadResponse};

/// Scripted stand-in for the file-storage collaborator.
///
/// Responses are consumed in push order; without a script, every file in the
/// batch is reported as uploaded under `https://uploads.example/<name>`.
#[derive(Debug, Default)]
pub struct MockUploader {
    responses: Mutex<Vec<Result<UploadResponse, UploadError>>>,
    batches: Mutex<Vec<Vec<String>>>,
    calls: AtomicUsize,
}

impl MockUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: UploadResponse) {
        lock(&self.responses).push(Ok(response));
    }

    pub fn push_failure(&self, message: &str) {
        lock(&self.responses).push(Err(UploadError::new(message)));
    }

    /// Number of batch upload calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// File names of each received batch, in call order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        lock(&self.batches).clone()
    }
}

impl FileUploader for MockUploader {
    fn upload_files<'a>(
        &'a self,
        files: Vec<UploadPart>,
    ) -> BoxFuture<'a, Result<UploadResponse, UploadError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let names: Vec<String> = files.iter().map(|part| part.file_name.clone()).collect();
            lock(&self.batches).push(names.clone());

            let mut responses = lock(&self.responses);
            if responses.is_empty() {
                Ok(UploadResponse {
                    uploaded_files: names
                        .iter()
                        .map(|name| format!("https://uploads.example/{name}"))
                        .collect(),
                    skipped_files: Vec::new(),
                })
            } else {
                responses.remove(0)
            }
        })
    }
}

pub fn uploaded(urls: &[&str]) -> UploadResponse {
    UploadResponse {
        uploaded_files: urls.iter().map(|url| (*url).to_string()).collect(),
        skipped_files: Vec::new(),
    }
}

pub fn skipped(name: &str, reason: &str) -> SkippedFile {
    SkippedFile {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
