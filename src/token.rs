//! Shared bearer-token holder.
//!
//! The backend authenticates every request with an optional bearer token.
//! Rather than reading ambient global state, the transport layer is handed a
//! [`TokenStore`]: a cheap cloneable handle to one process-wide slot.
//!
//! Writer contract: the token is updated only on login, refresh, and logout.
//! Request paths only ever read it.

use std::sync::{Arc, RwLock};

/// Cloneable handle to the shared credential slot.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    /// An empty store: requests go out without an Authorization header.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }

    /// The current token, if any.
    pub fn get(&self) -> Option<String> {
        self.inner.read().expect("token lock poisoned").clone()
    }

    /// Replace the token (login or refresh).
    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write().expect("token lock poisoned") = Some(token.into());
    }

    /// Drop the token (logout).
    pub fn clear(&self) {
        *self.inner.write().expect("token lock poisoned") = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().expect("token lock poisoned").is_some()
    }
}
