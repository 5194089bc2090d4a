//! Configuration types for the VoteService.
use std::time::Duration;

use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Configuration for the VoteService.
///
/// Controls how hard the service tries to win a contended item, how long it
/// waits on the store, and whether authors may vote on their own content.
#[derive(Debug, Clone)]
pub struct VoteServiceConfig {
    /// Retries after the first read-decide-write attempt loses a race.
    ///
    /// Defaults to 5.
    pub max_retries: usize,

    /// Delay before the first retry; later retries double it.
    pub retry_base_delay: Duration,

    /// Upper bound on a single retry delay.
    pub max_retry_delay: Duration,

    /// Upper bound on each load or commit against the store.
    pub store_timeout: Duration,

    /// Whether an author may vote on their own item. Defaults to `true`.
    pub allow_self_votes: bool,
}

impl Default for VoteServiceConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_base_delay: Duration::from_millis(5),
            max_retry_delay: Duration::from_millis(200),
            store_timeout: Duration::from_secs(2),
            allow_self_votes: true,
        }
    }
}

impl VoteServiceConfig {
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn with_self_votes(mut self, allow_self_votes: bool) -> Self {
        self.allow_self_votes = allow_self_votes;
        self
    }

    /// Jittered exponential delays between attempts, one per allowed retry.
    pub fn retry_strategy(&self) -> impl Iterator<Item = Duration> + use<> {
        let base_millis = self.retry_base_delay.as_millis().max(1) as u64;
        ExponentialBackoff::from_millis(2)
            .factor(base_millis)
            .max_delay(self.max_retry_delay)
            .map(jitter)
            .take(self.max_retries)
    }
}
