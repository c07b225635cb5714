//! Wire types shared with the backend.
//!
//! Field names follow the backend's snake_case JSON. Where the platform has
//! historically emitted camelCase spellings for source references, serde
//! aliases accept both.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// How many history messages accompany a request. Both sides of the wire
/// enforce this window; anything older is dropped client-side before send.
pub const HISTORY_WINDOW: usize = 6;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation, as sent in request history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// ISO-8601 timestamp. Optional on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChatMessage {
    /// A user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Some(Utc::now().to_rfc3339()),
        }
    }

    /// An assistant message stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Some(Utc::now().to_rfc3339()),
        }
    }
}

/// A retrieval citation attached to an answer. Opaque to this crate:
/// decoded, accumulated, and handed to the subscriber verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReference {
    #[serde(alias = "sourceId")]
    pub source_id: String,
    #[serde(alias = "docId")]
    pub doc_id: String,
    #[serde(default, alias = "chunkId", skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<String>,
    pub content: String,
    /// Relevance score in [0, 1].
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Request body for the chat endpoints.
///
/// Retrieval options are passed through untouched; the backend owns their
/// defaults and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<ChatMessage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_graph: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_rerank: Option<bool>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<serde_json::Value>,
}

impl ChatRequest {
    /// Create a streaming request for a query. Options default to unset.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            conversation_id: None,
            history: None,
            top_k: None,
            use_graph: None,
            use_rerank: None,
            stream: true,
            filters: None,
        }
    }

    /// Continue an existing conversation.
    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    /// Attach prior turns as context, clamped to [`HISTORY_WINDOW`].
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        let start = history.len().saturating_sub(HISTORY_WINDOW);
        self.history = Some(history[start..].to_vec());
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_graph(mut self, use_graph: bool) -> Self {
        self.use_graph = Some(use_graph);
        self
    }

    pub fn with_rerank(mut self, use_rerank: bool) -> Self {
        self.use_rerank = Some(use_rerank);
        self
    }

    /// Switch to the buffered (non-streaming) response mode.
    pub fn non_streaming(mut self) -> Self {
        self.stream = false;
        self
    }
}

/// Buffered answer envelope from `POST /qa/chat` with `stream: false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceReference>,
    pub conversation_id: String,
    pub query: String,
    #[serde(default)]
    pub latency_ms: f64,
}

/// REST envelope the platform wraps buffered payloads in.
///
/// `code` is the backend's own status, independent of the HTTP status line;
/// anything outside {200, 201} is a reported failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}
