//! Configurable mock HTTP transport for tests.
//!
//! Responses are registered per URL (exact match first, then prefix match);
//! requests are recorded so tests can assert on method, body, and headers.
//! Streamed responses are delivered as a fixed sequence of chunks, which
//! makes it easy to exercise frame boundaries that fall mid-line.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, Response, TransportError};

/// A request the mock has seen, for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Headers,
    pub body: String,
}

/// What the mock should answer for a URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Buffered response for `post`.
    Success(Response),
    /// Error for `post`.
    Error(TransportError),
    /// Chunk sequence for `post_stream`. Each element is one transport chunk,
    /// delivered as-is; chunks may split lines or UTF-8 sequences anywhere.
    Stream(Vec<Bytes>),
    /// Chunk sequence that ends with a mid-stream read error.
    StreamThenError(Vec<Bytes>, TransportError),
    /// Error returned before any chunk (connection refused, non-2xx status).
    StreamError(TransportError),
}

/// In-memory [`HttpClient`] double.
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response for a URL. Later registrations replace earlier ones.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// All requests seen so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, url: &str, headers: &Headers, body: &str) {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });
    }

    fn lookup(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }
        responses
            .iter()
            .find(|(pattern, _)| url.starts_with(pattern.as_str()))
            .map(|(_, response)| response.clone())
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<Response, TransportError> {
        self.record(url, headers, body);

        match self.lookup(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) | Some(MockResponse::StreamError(err)) => Err(err),
            Some(MockResponse::Stream(_)) | Some(MockResponse::StreamThenError(..)) => Err(
                TransportError::Other("stream response configured for buffered request".into()),
            ),
            None => Err(TransportError::Other(format!(
                "no mock response for {url}"
            ))),
        }
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, TransportError> {
        self.record(url, headers, body);

        match self.lookup(url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(Box::pin(futures::stream::iter(chunks.into_iter().map(Ok))))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let items: Vec<Result<Bytes, TransportError>> = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(err)))
                    .collect();
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(MockResponse::StreamError(err)) | Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Success(_)) => Err(TransportError::Other(
                "buffered response configured for stream request".into(),
            )),
            None => Err(TransportError::Other(format!(
                "no mock response for {url}"
            ))),
        }
    }
}
