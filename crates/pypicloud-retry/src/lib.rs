use std::fmt::Display;
use std::num::NonZeroUsize;
use std::time::Duration;

use backon::{BlockingRetryable, ConstantBuilder};
use tracing::debug;

/// Run an operation up to a fixed number of times, retrying immediately on failure.
///
/// There is no delay, jitter or backoff between attempts. The error from the final attempt is
/// returned unchanged. Operations must be safe to repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    tries: NonZeroUsize,
}

const DEFAULT_TRIES: NonZeroUsize = NonZeroUsize::new(3).unwrap();

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            tries: DEFAULT_TRIES,
        }
    }
}

impl RetryPolicy {
    /// Create a policy that makes at most `tries` attempts.
    pub fn new(tries: NonZeroUsize) -> Self {
        Self { tries }
    }

    /// The maximum number of attempts, including the first.
    pub fn tries(&self) -> usize {
        self.tries.get()
    }

    /// Run `operation`, retrying on any error.
    pub fn run<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Display,
    {
        self.run_when(|_| true, operation)
    }

    /// Run `operation`, retrying only on errors for which `retryable` returns `true`.
    ///
    /// Any other error is returned immediately, without further attempts.
    pub fn run_when<T, E, F, P>(&self, mut retryable: P, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        P: FnMut(&E) -> bool,
        E: Display,
    {
        let backoff = ConstantBuilder::default()
            .with_delay(Duration::ZERO)
            .with_max_times(self.tries.get() - 1);

        operation
            .retry(backoff)
            .sleep(std::thread::sleep)
            .when(|err| retryable(err))
            .notify(|err, _| debug!("Attempt failed, retrying: {err}"))
            .call()
    }
}

/// Run `operation` at most `tries` times, retrying on any error.
pub fn retry<T, E, F>(tries: NonZeroUsize, operation: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Display,
{
    RetryPolicy::new(tries).run(operation)
}
