//! Bounded retry of transient storage failures.
//!
//! Only errors whose [`StoreError::is_transient`] is `true` are retried.
//! Record errors (not found, reference, validation) are returned at once.

use std::{future::Future, time::Duration};

use toro_core::StoreError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
  /// Total attempts, including the first. `0` behaves like `1`.
  pub max_attempts: u32,
  /// Delay before the second attempt; grows linearly after that.
  pub backoff:      Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self { max_attempts: 3, backoff: Duration::from_millis(50) }
  }
}

impl RetryPolicy {
  /// A policy that never retries.
  pub fn none() -> Self { Self { max_attempts: 1, backoff: Duration::ZERO } }

  pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
  where
    E: StoreError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
  {
    let mut attempt = 1;
    loop {
      match op().await {
        Err(e) if e.is_transient() && attempt < self.max_attempts => {
          tracing::warn!(attempt, error = %e, "transient storage error, retrying");
          tokio::time::sleep(self.backoff * attempt).await;
          attempt += 1;
        }
        result => return result,
      }
    }
  }
}
