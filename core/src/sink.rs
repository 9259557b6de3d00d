//! Observability hook for related-resource failures the resolver absorbs.

use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::error::ApiError;

/// One reference that failed to resolve and was left out of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedFailure {
    /// Name of the reference field, e.g. `films` or `pilot`.
    pub field: String,
    pub url: String,
    pub error: ApiError,
}

/// Receives every absorbed related-fetch failure.
///
/// Sinks only observe; they cannot change what the resolver returns.
pub trait FailureSink: Send + Sync {
    fn record(&self, failure: &RelatedFailure);
}

impl<F> FailureSink for F
where
    F: Fn(&RelatedFailure) + Send + Sync,
{
    fn record(&self, failure: &RelatedFailure) {
        self(failure);
    }
}

/// Default sink: one structured `warn` event per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, failure: &RelatedFailure) {
        warn!(
            field = %failure.field,
            url = %failure.url,
            error = %failure.error,
            "related resource dropped"
        );
    }
}

/// Keeps failures in memory so the caller can inspect them afterwards.
#[derive(Debug, Default)]
pub struct CollectingSink {
    failures: Mutex<Vec<RelatedFailure>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<RelatedFailure> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<RelatedFailure> {
        std::mem::take(&mut *self.failures.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl FailureSink for CollectingSink {
    fn record(&self, failure: &RelatedFailure) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure.clone());
    }
}
