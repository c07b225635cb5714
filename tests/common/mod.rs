//! Shared fixtures for integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use kbqa_client::adapters::mock::MockHttpClient;
use kbqa_client::consumer::{ExchangeUpdate, StreamingAnswerConsumer};
use kbqa_client::{ClientConfig, QaClient};

/// Base URL used with the mock transport.
pub const BASE_URL: &str = "http://test/api/v1";

/// Streaming chat endpoint under [`BASE_URL`].
pub const STREAM_URL: &str = "http://test/api/v1/qa/chat/stream";

/// Render event payloads as an SSE body, one `data: ` frame per payload
/// with a blank separator line.
pub fn sse_body(payloads: &[&str]) -> Bytes {
    let mut body = String::new();
    for payload in payloads {
        body.push_str("data: ");
        body.push_str(payload);
        body.push_str("\n\n");
    }
    Bytes::from(body)
}

/// A consumer wired to the given mock transport.
pub fn consumer_over(mock: &MockHttpClient) -> StreamingAnswerConsumer {
    StreamingAnswerConsumer::new(QaClient::with_http_client(
        ClientConfig::new().with_base_url(BASE_URL),
        Arc::new(mock.clone()),
    ))
}

/// Collect every update buffered on the channel.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<ExchangeUpdate>) -> Vec<ExchangeUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

/// Count terminal completions in an update sequence.
pub fn completions(updates: &[ExchangeUpdate]) -> usize {
    updates
        .iter()
        .filter(|u| matches!(u, ExchangeUpdate::Completed))
        .count()
}
