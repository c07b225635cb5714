//! HTTP transport abstraction.
//!
//! The client only ever issues POST requests against the backend: a plain
//! request/response call for the non-streaming endpoints and a streamed call
//! for the Server-Sent-Events endpoints. Abstracting those two operations
//! behind a trait lets tests drive the full decode pipeline without a
//! network.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

/// Request headers as a key-value map.
pub type Headers = HashMap<String, String>;

/// A stream of raw body chunks from a streamed response.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Transport-level failures: anything that goes wrong before or while
/// reading bytes, as opposed to errors reported inside the event protocol.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Could not reach the backend at all.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// The request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),
    /// The backend answered with a non-2xx status.
    ///
    /// The display format is the platform's established contract for HTTP
    /// failures; callers show it verbatim.
    #[error("HTTP error! status: {status}")]
    Status { status: u16, message: String },
    /// The connection dropped while reading the response body.
    #[error("read error: {0}")]
    Io(String),
    /// Anything the transport reports that fits no other bucket.
    #[error("network error: {0}")]
    Other(String),
}

/// A buffered (non-streamed) HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Full response body.
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as UTF-8 text, lossily converted.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The two HTTP operations the client needs.
///
/// Implemented by [`crate::adapters::ReqwestHttpClient`] in production and
/// [`crate::adapters::mock::MockHttpClient`] in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// POST a JSON body and buffer the whole response.
    async fn post(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<Response, TransportError>;

    /// POST a JSON body and return the response body as a chunk stream.
    ///
    /// A non-2xx status is reported as [`TransportError::Status`] before any
    /// chunk is yielded.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, TransportError>;
}
