use super::error::ServiceError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

// Client retry defaults
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Timeout and retry settings for Bot Service requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound for a single attempt
    pub request_timeout: Duration,
    /// Attempts per request, first one included
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each further one
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(request_timeout: Duration, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            request_timeout,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no waiting
    pub fn no_retry(request_timeout: Duration) -> Self {
        Self::new(request_timeout, 1, Duration::ZERO)
    }

    /// Delay after the given (1-based) failed attempt, with exponential backoff
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() || attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 2_u32.saturating_pow(attempt - 1);
        let delay = self.base_delay.saturating_mul(factor);
        std::cmp::min(delay, MAX_RETRY_DELAY)
    }

    /// Run `operation` until it succeeds, fails or attempts run out.
    ///
    /// Each attempt is bounded by `request_timeout`. Only failures where the
    /// request never reached the service are sent again here; bot service
    /// endpoints are not idempotent, so timeouts and server errors are
    /// returned after one attempt and left to an explicit retry.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, ServiceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut last_error: Option<ServiceError> = None;

        for attempt in 1..=max_attempts {
            debug!("{}: attempt {}/{}", label, attempt, max_attempts);

            let outcome = match tokio::time::timeout(self.request_timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(ServiceError::timeout(label, self.request_timeout)),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("{} failed (attempt {}/{}): {}", label, attempt, max_attempts, e);
                    if !e.is_safe_to_resend() {
                        return Err(e);
                    }
                    last_error = Some(e);
                }
            }

            // Wait before retrying (except on last attempt)
            if attempt < max_attempts {
                let delay = self.delay_for_attempt(attempt);
                if !delay.is_zero() {
                    debug!("Waiting {}ms before retry", delay.as_millis());
                    tokio::time::sleep(delay).await;
                }
            }
        }

        let final_error = last_error.unwrap_or_else(|| {
            ServiceError::Transport(format!("{} failed after {} attempts", label, max_attempts))
        });
        error!("All {} attempts failed for {}: {}", max_attempts, label, final_error);
        Err(final_error)
    }
}
