//! The accumulator for one query/answer exchange.
//!
//! An [`Exchange`] is owned by exactly one `consume` invocation for its
//! lifetime. It collects the streamed answer and citations, binds the
//! conversation id once, and tracks the terminal state. Both terminal
//! states are absorbing: once an exchange is done or errored nothing
//! mutates it further.

use crate::models::{ChatMessage, Role, SourceReference, HISTORY_WINDOW};

/// Lifecycle of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    /// Streaming in progress.
    Active,
    /// Terminated normally (explicit `done` or natural end of stream).
    Done,
    /// Terminated by a reported or transport error.
    Errored,
}

/// One user query and its evolving answer.
#[derive(Debug, Clone)]
pub struct Exchange {
    query: String,
    conversation_id: Option<String>,
    /// Context passed to the backend; clamped at construction, never
    /// touched afterwards.
    history: Vec<ChatMessage>,
    /// Transcript of this exchange: the user turn plus the assistant turn
    /// being streamed. The assistant turn's content is overwritten with the
    /// full accumulated text on every delta, never appended to.
    messages: Vec<ChatMessage>,
    answer: String,
    sources: Vec<SourceReference>,
    phase: ExchangePhase,
    error: Option<String>,
}

impl Exchange {
    /// Start an exchange for a query. `history` is clamped to the most
    /// recent [`HISTORY_WINDOW`] entries.
    pub fn new(query: impl Into<String>, mut history: Vec<ChatMessage>) -> Self {
        let query = query.into();
        if history.len() > HISTORY_WINDOW {
            history.drain(..history.len() - HISTORY_WINDOW);
        }
        let messages = vec![ChatMessage::user(query.clone()), ChatMessage::assistant("")];
        Self {
            query,
            conversation_id: None,
            history,
            messages,
            answer: String::new(),
            sources: Vec::new(),
            phase: ExchangePhase::Active,
            error: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The full accumulated answer text.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn sources(&self) -> &[SourceReference] {
        &self.sources
    }

    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.phase != ExchangePhase::Active
    }

    /// Bind the conversation id. Only the first binding takes; later
    /// attempts are ignored. Returns whether this call bound it.
    pub fn bind_conversation(&mut self, id: impl Into<String>) -> bool {
        if self.conversation_id.is_some() {
            return false;
        }
        self.conversation_id = Some(id.into());
        true
    }

    /// Append a text delta and return the accumulated answer. An empty
    /// delta is a legal no-op that still refreshes the assistant turn.
    pub fn append_text(&mut self, delta: &str) -> &str {
        self.answer.push_str(delta);
        if let Some(last) = self
            .messages
            .iter_mut()
            .rev()
            .find(|m| m.role == Role::Assistant)
        {
            last.content = self.answer.clone();
        }
        &self.answer
    }

    /// Append a citation. Duplicates are kept; ordering is arrival order.
    pub fn push_source(&mut self, source: SourceReference) -> &[SourceReference] {
        self.sources.push(source);
        &self.sources
    }

    /// Transition to `Done`. No-op once terminal.
    pub fn complete(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.phase = ExchangePhase::Done;
        true
    }

    /// Transition to `Errored` with a message. No-op once terminal.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.phase = ExchangePhase::Errored;
        self.error = Some(message.into());
        true
    }
}
