//! Test doubles for the transport layer.

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
