//! Streaming client for a knowledge-base question answering backend.
//!
//! The crate's one stateful piece is [`consumer::StreamingAnswerConsumer`]:
//! it runs a single question-answer exchange against the backend's streamed
//! chat endpoint, decoding Server-Sent-Events frames into typed updates for
//! the host application. Everything around it is plumbing: wire models, the
//! SSE decode pipeline, a transport abstraction with a mock for tests, and
//! a shared bearer-token holder.

pub mod adapters;
pub mod client;
pub mod config;
pub mod consumer;
pub mod error;
pub mod exchange;
pub mod logging;
pub mod models;
pub mod sse;
pub mod token;
pub mod traits;

pub use client::QaClient;
pub use config::ClientConfig;
pub use consumer::{ExchangeUpdate, StreamingAnswerConsumer};
pub use error::{ClientError, ClientResult};
pub use exchange::{Exchange, ExchangePhase};
pub use models::{ChatMessage, ChatRequest, ChatResponse, Role, SourceReference};
pub use token::TokenStore;
