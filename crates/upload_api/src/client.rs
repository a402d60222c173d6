use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::config::UploadApiConfig;
use crate::error::{parse_error_message, UploadApiError};
use crate::payload::{UploadPart, UploadResponse};

/// Multipart form field name the endpoint expects for each file.
const FILE_FIELD: &str = "files";

#[derive(Debug)]
pub struct UploadClient {
    http: Client,
    config: UploadApiConfig,
}

impl UploadClient {
    pub fn new(config: UploadApiConfig) -> Result<Self, UploadApiError> {
        if config.base_url.trim().is_empty() {
            return Err(UploadApiError::MissingBaseUrl);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(UploadApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &UploadApiConfig {
        &self.config
    }

    pub fn build_headers(&self) -> Result<HeaderMap, UploadApiError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = self
            .config
            .auth_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| UploadApiError::InvalidHeader("authorization".to_string()))?,
            );
        }

        if let Some(user_agent) = self.config.user_agent.as_deref() {
            headers.insert(
                USER_AGENT,
                HeaderValue::from_str(user_agent)
                    .map_err(|_| UploadApiError::InvalidHeader("user-agent".to_string()))?,
            );
        }

        for (key, value) in &self.config.extra_headers {
            headers.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| UploadApiError::InvalidHeader(format!("invalid key: {key}")))?,
                HeaderValue::from_str(value).map_err(|_| {
                    UploadApiError::InvalidHeader(format!("invalid value for {key}"))
                })?,
            );
        }

        Ok(headers)
    }

    /// Uploads one batch of files in a single multipart request.
    ///
    /// The decoded response reports accepted and skipped files by name; this
    /// client performs no retries, since a failed batch is terminal for the
    /// enclosing send attempt.
    pub async fn upload(&self, parts: Vec<UploadPart>) -> Result<UploadResponse, UploadApiError> {
        if parts.is_empty() {
            return Err(UploadApiError::EmptyBatch);
        }

        let mut form = Form::new();
        for part in parts {
            if part.file_name.trim().is_empty() {
                return Err(UploadApiError::InvalidPart(
                    "file name must not be empty".to_string(),
                ));
            }

            let file_part = Part::bytes(part.bytes)
                .file_name(part.file_name.clone())
                .mime_str(&part.mime_type)
                .map_err(|_| {
                    UploadApiError::InvalidPart(format!(
                        "invalid mime type '{}' for {}",
                        part.mime_type, part.file_name
                    ))
                })?;
            form = form.part(FILE_FIELD, file_part);
        }

        let headers = self.build_headers()?;
        let response = self
            .http
            .post(self.config.endpoint())
            .headers(headers)
            .multipart(form)
            .send()
            .await
            .map_err(UploadApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadApiError::Status(
                status,
                parse_error_message(status, &body),
            ));
        }

        let body = response.text().await.map_err(UploadApiError::from)?;
        let decoded = serde_json::from_str::<UploadResponse>(&body)?;
        Ok(decoded)
    }
}
