//! Bounded retries with a fixed delay and a per-attempt timeout.

use crate::error::SubtranError;
use crate::translate::{TranslationOutcome, TranslationRequest, Translator};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// How many times to try a line and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
    /// Time allowed for a single attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Pause to take after failed attempt number `attempt` (1-based), or
    /// `None` when no attempts remain.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.max_attempts).then_some(self.delay)
    }
}

/// Translate one request under `policy`, never failing.
///
/// Each attempt is bounded by `policy.attempt_timeout`; once attempts run
/// out the outcome is a fallback and the caller keeps the original line.
pub async fn translate_with_retry(
    translator: &dyn Translator,
    request: &TranslationRequest,
    policy: &RetryPolicy,
) -> TranslationOutcome {
    let line = request.text.trim();
    let mut attempt = 0;

    loop {
        attempt += 1;
        let start = Instant::now();

        let result =
            match tokio::time::timeout(policy.attempt_timeout, translator.translate(request)).await
            {
                Ok(result) => result,
                Err(_) => Err(SubtranError::Timeout(policy.attempt_timeout)),
            };

        let last_error = match result {
            Ok(text) => {
                info!(
                    "Translation successful in {:.2} seconds for line: {}",
                    start.elapsed().as_secs_f64(),
                    line
                );
                return TranslationOutcome::Translated {
                    text,
                    attempts: attempt,
                };
            }
            Err(e) => {
                warn!("Attempt {} failed: {}", attempt, e);
                e.to_string()
            }
        };

        match policy.delay_after(attempt) {
            Some(delay) => tokio::time::sleep(delay).await,
            None => {
                error!("Final attempt failed for line: {}", line);
                return TranslationOutcome::Fallback {
                    attempts: attempt,
                    last_error,
                };
            }
        }
    }
}
