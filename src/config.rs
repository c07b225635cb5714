//! Client configuration.

use std::time::Duration;

/// Default API root when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Environment variable overriding the API root.
pub const BASE_URL_ENV: &str = "KBQA_BASE_URL";

/// Connection settings for [`crate::client::QaClient`].
///
/// Only the connect timeout is bounded; streamed responses stay open as long
/// as the backend keeps generating.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root, without a trailing slash. Endpoint paths are appended.
    pub base_url: String,
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        self.base_url = base_url;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Read overrides from the environment (`KBQA_BASE_URL`).
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
