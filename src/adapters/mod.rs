//! Concrete implementations of the transport abstraction.
//!
//! - [`ReqwestHttpClient`] — production transport over reqwest
//! - [`mock::MockHttpClient`] — configurable in-memory double for tests

pub mod mock;
pub mod reqwest_http;

pub use mock::MockHttpClient;
pub use reqwest_http::ReqwestHttpClient;
