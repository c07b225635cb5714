//! Client error taxonomy.
//!
//! Three failure families reach callers:
//!
//! - [`ClientError::Transport`] — connection/HTTP failures, surfaced before
//!   or during a stream read;
//! - [`ClientError::Api`] — the backend's REST envelope reported a non-OK
//!   code inside an HTTP 200;
//! - [`ClientError::Decode`] — a buffered response body did not match the
//!   expected shape.
//!
//! Malformed *stream frames* are deliberately absent here: they are skipped
//! inside the event stream with a diagnostic so one bad frame cannot abort a
//! mostly-good answer.

use thiserror::Error;

use crate::traits::TransportError;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, timeout, or HTTP status failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The REST envelope carried a failure code.
    #[error("backend error ({code}): {message}")]
    Api { code: i64, message: String },

    /// A buffered response body could not be decoded.
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request was rejected before anything was sent.
    #[error("query must not be empty")]
    EmptyQuery,
}
