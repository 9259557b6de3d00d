//! "Settle all, keep successes" fan-in.
//!
//! Unlike `try_join_all`, nothing here short-circuits: every future runs to
//! completion and the outcomes are partitioned afterwards.

use std::future::Future;

use futures::future::join_all;

/// Partitioned outcome of [`settle_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled<T, E> {
    /// Successful values, in the order their futures were supplied.
    pub fulfilled: Vec<T>,
    /// Failures tagged with the index of the future that produced them.
    pub rejected: Vec<(usize, E)>,
}

impl<T, E> Settled<T, E> {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Drive every future concurrently and wait for all of them to finish.
///
/// Output order follows input order, not completion order.
pub async fn settle_all<I, F, T, E>(futures: I) -> Settled<T, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let outcomes = join_all(futures).await;
    let mut fulfilled = Vec::with_capacity(outcomes.len());
    let mut rejected = Vec::new();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(value) => fulfilled.push(value),
            Err(error) => rejected.push((index, error)),
        }
    }
    Settled {
        fulfilled,
        rejected,
    }
}
