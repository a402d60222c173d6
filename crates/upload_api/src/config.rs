use std::collections::BTreeMap;
use std::time::Duration;

/// Transport configuration for upload requests.
#[derive(Debug, Clone, Default)]
pub struct UploadApiConfig {
    /// Full URL of the upload endpoint.
    pub base_url: String,
    /// Optional bearer token passed to `Authorization`.
    pub auth_token: Option<String>,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl UploadApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Endpoint with any trailing slash removed.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.base_url.trim().trim_end_matches('/').to_string()
    }
}
