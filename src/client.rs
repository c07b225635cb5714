//! HTTP client for the question-answering endpoints.
//!
//! [`QaClient`] owns the request plumbing: endpoint URLs, JSON bodies, the
//! bearer header, and for the streaming endpoints the byte → line → frame →
//! event decode pipeline. It knows nothing about exchanges; that is
//! [`crate::consumer::StreamingAnswerConsumer`]'s job.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;
use serde::Serialize;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{ApiEnvelope, ChatRequest, ChatResponse};
use crate::sse::{decode_event, parse_frame_line, FrameLine, LineBuffer, StreamEvent};
use crate::token::TokenStore;
use crate::traits::{ByteStream, Headers, HttpClient, TransportError};

/// A stream of decoded events from a chat stream endpoint.
///
/// Malformed frames never appear here (they are skipped with a diagnostic);
/// transport read failures do, and are terminal for the exchange.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, TransportError>> + Send>>;

/// Envelope codes the backend uses for success.
const ENVELOPE_OK: [i64; 2] = [200, 201];

#[derive(Serialize)]
struct SimpleChatBody<'a> {
    query: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

/// Client for the `/qa` endpoints.
#[derive(Clone)]
pub struct QaClient {
    config: ClientConfig,
    http: Arc<dyn HttpClient>,
    tokens: TokenStore,
}

impl QaClient {
    /// Production client over reqwest, honoring the configured connect
    /// timeout.
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_default();
        Self {
            config,
            http: Arc::new(ReqwestHttpClient::with_client(client)),
            tokens: TokenStore::new(),
        }
    }

    /// Client over an injected transport. Tests use this with the mock.
    pub fn with_http_client(config: ClientConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http,
            tokens: TokenStore::new(),
        }
    }

    /// Use a shared token store instead of a fresh empty one.
    pub fn with_tokens(mut self, tokens: TokenStore) -> Self {
        self.tokens = tokens;
        self
    }

    /// The token store this client reads the bearer token from.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn headers(&self, streaming: bool) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if streaming {
            headers.insert("Accept".to_string(), "text/event-stream".to_string());
        }
        if let Some(token) = self.tokens.get() {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        headers
    }

    /// Open the streaming chat endpoint and decode its frames.
    ///
    /// `stream: true` is forced on the request regardless of what the
    /// builder produced.
    pub async fn chat_stream(&self, request: &ChatRequest) -> ClientResult<EventStream> {
        let mut request = request.clone();
        request.stream = true;

        let url = self.config.endpoint("/qa/chat/stream");
        let body = serde_json::to_string(&request)?;
        let bytes = self
            .http
            .post_stream(&url, &body, &self.headers(true))
            .await?;

        Ok(decode_byte_stream(bytes))
    }

    /// Buffered fallback: `POST /qa/chat` with `stream: false`, answered as
    /// one enveloped JSON payload.
    pub async fn chat(&self, request: &ChatRequest) -> ClientResult<ChatResponse> {
        let mut request = request.clone();
        request.stream = false;

        let url = self.config.endpoint("/qa/chat");
        let body = serde_json::to_string(&request)?;
        let response = self.http.post(&url, &body, &self.headers(false)).await?;

        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                message: response.text(),
            }
            .into());
        }

        let envelope: ApiEnvelope<ChatResponse> = response.json()?;
        if !ENVELOPE_OK.contains(&envelope.code) {
            return Err(ClientError::Api {
                code: envelope.code,
                message: envelope.message,
            });
        }
        envelope.data.ok_or(ClientError::Api {
            code: envelope.code,
            message: "response envelope carried no data".to_string(),
        })
    }

    /// Lightweight single-query endpoint; same streamed event protocol,
    /// minimal request body.
    pub async fn simple_chat(&self, query: &str, top_k: Option<u32>) -> ClientResult<EventStream> {
        let url = self.config.endpoint("/qa/simple");
        let body = serde_json::to_string(&SimpleChatBody {
            query,
            stream: true,
            top_k,
        })?;
        let bytes = self
            .http
            .post_stream(&url, &body, &self.headers(true))
            .await?;

        Ok(decode_byte_stream(bytes))
    }
}

struct DecodeState {
    bytes: ByteStream,
    lines: LineBuffer,
    pending: VecDeque<String>,
    skipped: u64,
    ended: bool,
}

/// Turn a raw chunk stream into a typed event stream.
///
/// Frames arrive split at arbitrary byte boundaries; completed lines are
/// classified and decoded one at a time, in order. Malformed payloads are
/// skipped and counted, never propagated.
fn decode_byte_stream(bytes: ByteStream) -> EventStream {
    let state = DecodeState {
        bytes,
        lines: LineBuffer::new(),
        pending: VecDeque::new(),
        skipped: 0,
        ended: false,
    };

    let events = stream::unfold(state, |mut state| async move {
        loop {
            while let Some(line) = state.pending.pop_front() {
                match parse_frame_line(&line) {
                    FrameLine::Data(payload) => match decode_event(&payload) {
                        Ok(StreamEvent::Unknown) => {
                            tracing::debug!(payload = %payload, "ignoring unknown event kind");
                        }
                        Ok(event) => return Some((Ok(event), state)),
                        Err(err) => {
                            state.skipped += 1;
                            tracing::warn!(error = %err, payload = %payload, "skipping malformed frame");
                        }
                    },
                    FrameLine::Blank | FrameLine::Other => {}
                }
            }

            if state.ended {
                if state.skipped > 0 {
                    tracing::debug!(skipped = state.skipped, "stream ended with skipped frames");
                }
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    state.pending.extend(state.lines.push_chunk(&chunk));
                }
                Some(Err(err)) => return Some((Err(err), state)),
                None => {
                    state.ended = true;
                    if let Some(tail) = state.lines.finish() {
                        state.pending.push_back(tail);
                    }
                }
            }
        }
    });

    Box::pin(events)
}
