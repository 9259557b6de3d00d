//! HTTP exchange types for the host-does-IO split.
//!
//! # Design
//! Requests and responses are plain data. [`CatalogClient`](crate::client::CatalogClient)
//! builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network; a [`Transport`](crate::transport::Transport) runs
//! the round-trip in between. Every request the catalog makes is a GET, so
//! there is no method field.

use url::Url;

/// A GET request described as plain data.
///
/// The URL has already passed the trusted-origin check by the time a value
/// of this type exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// Non-2xx responses are still `HttpResponse` values; status interpretation
/// belongs to the parser.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A response with no headers, mostly useful for stubs and test vectors.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
