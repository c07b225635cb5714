//! The streaming answer consumer.
//!
//! [`StreamingAnswerConsumer`] owns the lifecycle of one question-answer
//! exchange: it opens the streamed connection, applies each decoded event to
//! the [`Exchange`] accumulator, and publishes typed [`ExchangeUpdate`]s to
//! the subscriber's channel. The contract callers build on:
//!
//! - updates arrive in the exact order events were decoded;
//! - [`ExchangeUpdate::Completed`] is published exactly once per started
//!   exchange, after every other update, no matter how the stream ends;
//! - [`ExchangeUpdate::Failed`] is advisory and never replaces completion;
//! - nothing is published after the subscriber drops its receiver.

use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::client::QaClient;
use crate::error::{ClientError, ClientResult};
use crate::exchange::Exchange;
use crate::models::{ChatRequest, SourceReference};
use crate::sse::StreamEvent;

/// Default message for an `error` event that carries none.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Typed updates published while an exchange streams.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeUpdate {
    /// The backend assigned a conversation id to this exchange. Published
    /// at most once; the binding is immutable afterwards.
    ConversationBound(String),
    /// The full accumulated answer text. Subscribers overwrite their copy;
    /// they never concatenate.
    Answer(String),
    /// The full citation list so far, in arrival order.
    Sources(Vec<SourceReference>),
    /// The exchange failed; the message is displayable as-is. Completion
    /// still follows.
    Failed(String),
    /// Terminal. Published exactly once, after all other updates.
    Completed,
}

/// Drives one exchange at a time against the streaming chat endpoint.
///
/// `consume` takes `&mut self`, so a second exchange cannot start on the
/// same consumer until the current one has finished. Callers surface that
/// as a disabled send control while streaming.
pub struct StreamingAnswerConsumer {
    client: QaClient,
}

impl StreamingAnswerConsumer {
    pub fn new(client: QaClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &QaClient {
        &self.client
    }

    /// Run one exchange to completion.
    ///
    /// Returns `Err` only when the request is rejected up front (blank
    /// query) — no connection is opened and nothing is published. Once the
    /// exchange starts, every outcome (including transport failure) is
    /// reported through `updates` and the accumulated [`Exchange`] is
    /// returned.
    ///
    /// Dropping the receiver side of `updates` abandons the exchange: the
    /// transport is released and no further update is delivered.
    pub async fn consume(
        &mut self,
        request: ChatRequest,
        updates: mpsc::UnboundedSender<ExchangeUpdate>,
    ) -> ClientResult<Exchange> {
        if request.query.trim().is_empty() {
            return Err(ClientError::EmptyQuery);
        }

        let mut exchange = Exchange::new(
            request.query.clone(),
            request.history.clone().unwrap_or_default(),
        );
        tracing::info!(query = %exchange.query(), "exchange started");

        let mut stream = match self.client.chat_stream(&request).await {
            Ok(stream) => stream,
            Err(err) => {
                let message = err.to_string();
                tracing::error!(error = %message, "failed to open stream");
                exchange.fail(message.clone());
                let _ = updates.send(ExchangeUpdate::Failed(message));
                let _ = updates.send(ExchangeUpdate::Completed);
                return Ok(exchange);
            }
        };

        loop {
            if updates.is_closed() {
                tracing::debug!("subscriber gone, abandoning exchange");
                break;
            }

            match stream.next().await {
                Some(Ok(StreamEvent::Start { conversation_id })) => {
                    if let Some(id) = conversation_id {
                        if exchange.bind_conversation(id.clone()) {
                            let _ = updates.send(ExchangeUpdate::ConversationBound(id));
                        }
                    }
                }
                Some(Ok(StreamEvent::Text { content })) => {
                    // Empty deltas still refresh the answer so the
                    // subscriber sees the stream is alive.
                    let accumulated = exchange.append_text(&content).to_string();
                    let _ = updates.send(ExchangeUpdate::Answer(accumulated));
                }
                Some(Ok(StreamEvent::Source { source })) => {
                    let sources = exchange.push_source(source).to_vec();
                    let _ = updates.send(ExchangeUpdate::Sources(sources));
                }
                Some(Ok(StreamEvent::Done)) => {
                    exchange.complete();
                    tracing::info!("exchange completed");
                    break;
                }
                Some(Ok(StreamEvent::Error { error })) => {
                    let message = error.unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                    tracing::warn!(error = %message, "backend reported error");
                    exchange.fail(message.clone());
                    let _ = updates.send(ExchangeUpdate::Failed(message));
                    break;
                }
                Some(Ok(StreamEvent::Unknown)) => {}
                Some(Err(err)) => {
                    let message = err.to_string();
                    tracing::error!(error = %message, "stream read failed");
                    exchange.fail(message.clone());
                    let _ = updates.send(ExchangeUpdate::Failed(message));
                    break;
                }
                None => {
                    // Natural end of stream without a terminal frame counts
                    // as completion.
                    exchange.complete();
                    tracing::info!("stream closed, treating as completed");
                    break;
                }
            }
        }

        // Dropping the stream closes the connection; any bytes still in
        // flight after a terminal frame are never read.
        drop(stream);

        let _ = updates.send(ExchangeUpdate::Completed);
        Ok(exchange)
    }
}
