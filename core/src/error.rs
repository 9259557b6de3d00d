//! Error types for the catalog client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers turn a missing primary
//! entity into a "not found" page, while every other non-2xx response lands
//! in `HttpError`. The enum is `Clone` so absorbed failures can be handed to
//! a [`FailureSink`](crate::sink::FailureSink) and kept around.

use thiserror::Error;

/// Errors produced while building, executing, or parsing catalog requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The URL is not an absolute URL on the trusted API origin. No request
    /// was issued.
    #[error("refusing to fetch {url}: not on the trusted origin")]
    InvalidOrigin { url: String },

    /// The upstream could not be reached (DNS, refused connection, timeout,
    /// truncated body).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status} {status_text}")]
    HttpError { status: u16, status_text: String },

    /// The body could not be decoded into the expected shape.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The aggregator was called with a primary entity or selector it cannot
    /// work with.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The client configuration is unusable (bad base URL, bad timeout).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// The HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
