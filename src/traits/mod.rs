//! Trait abstractions for the client's external dependencies.
//!
//! Only the HTTP transport is abstracted: everything else the crate does is
//! pure computation over decoded data. Production code injects
//! [`crate::adapters::ReqwestHttpClient`]; tests inject
//! [`crate::adapters::mock::MockHttpClient`].

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, Response, TransportError};
