use std::time::Duration;

/// Bounded exponential backoff for idempotent outbound calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (zero-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Runs an async block, retrying it on transient [`AppError`]s.
///
/// The block is re-evaluated for every attempt, so it must build its request
/// from scratch. Non-transient errors and the final failure are returned as-is.
///
/// # Arguments
/// * `$policy`: The [`RetryPolicy`] bounding attempts and backoff.
/// * `$operation`: Static name used in log events.
/// * `$block`: An `async` block yielding `AppResult<T>`.
///
/// # Example
/// ```ignore
/// let members = retrying!(self.retry, "fetch_members", async {
///     self.fetch_members_once(lobby_id).await
/// })?;
/// ```
///
/// [`AppError`]: crate::error::AppError
#[macro_export]
macro_rules! retrying {
    ($policy:expr, $operation:expr, $block:expr) => {{
        let policy: $crate::services::providers::RetryPolicy = $policy;
        let mut attempt: u32 = 0;
        loop {
            match $block.await {
                Ok(value) => break Ok(value),
                Err(err)
                    if attempt < policy.max_retries
                        && $crate::error::AppError::is_transient(&err) =>
                {
                    let delay = policy.backoff_for(attempt);
                    tracing::warn!(
                        operation = $operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => break Err(err),
            }
        }
    }};
}
