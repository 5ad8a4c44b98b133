// Retrying request executor.
//
// Every call to the API goes through here: up to `max_attempts` attempts
// with linear backoff, then one re-login and a single final attempt.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::clock::{Clock, TokioClock};
use crate::error::Error;
use crate::session::SessionManager;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Attempt budget and backoff step for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts before falling back to re-login.
    pub max_attempts: u32,
    /// Attempt `i` (0-based) waits `i * backoff_step` before firing.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given 0-based attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

/// Executes requests with retries and re-authentication fallback.
pub struct RequestExecutor {
    transport: Transport,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
    session: SessionManager,
}

impl RequestExecutor {
    pub fn new(transport: Transport, credentials: Credentials) -> Self {
        Self {
            transport,
            clock: Arc::new(TokioClock),
            policy: RetryPolicy::default(),
            session: SessionManager::new(credentials),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Log in (or re-authenticate) explicitly.
    pub async fn login(&self) -> bool {
        self.session.login(self).await
    }

    // ── Public contract: absence on failure ──────────────────────────

    /// Run a request; `None` means it failed beyond recovery.
    pub async fn query(&self, request: &ApiRequest) -> Option<ApiResponse> {
        match self.execute(request).await {
            Ok(resp) => Some(resp),
            Err(e) => {
                warn!(path = %request.path, kind = ?e.kind(), error = %e, "query gave up");
                None
            }
        }
    }

    /// Run a request and return the `body` member of its response.
    pub async fn query_body(&self, request: &ApiRequest) -> Option<Value> {
        match self.execute_body(request).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(path = %request.path, kind = ?e.kind(), error = %e, "query gave up");
                None
            }
        }
    }

    // ── Explicit-error forms ─────────────────────────────────────────

    /// Run a request with retries, re-login and one final attempt.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, Error> {
        let exhausted = match self.send_with_retries(request).await {
            Ok(resp) => return Ok(resp),
            Err(e) => e,
        };

        warn!(path = %request.path, error = %exhausted, "retries exhausted, logging in again");
        self.session.authenticate(self).await?;

        debug!(path = %request.path, "re-authenticated, final attempt");
        self.transport.send(request).await
    }

    pub async fn execute_body(&self, request: &ApiRequest) -> Result<Value, Error> {
        self.execute(request)
            .await?
            .into_body()
            .ok_or_else(|| Error::MissingBody {
                path: request.path.clone(),
                member: "body",
            })
    }

    /// The bounded retry loop alone, without the re-login fallback.
    pub(crate) async fn send_with_retries(
        &self,
        request: &ApiRequest,
    ) -> Result<ApiResponse, Error> {
        let mut last = None;

        for attempt in 0..self.policy.max_attempts {
            let delay = self.policy.delay_for(attempt);
            if !delay.is_zero() {
                self.clock.sleep(delay).await;
            }

            match self.transport.send(request).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    warn!(
                        path = %request.path,
                        attempt = attempt + 1,
                        error = %e,
                        "query failed, retrying"
                    );
                    last = Some(e);
                }
            }
        }

        Err(Error::RetriesExhausted {
            path: request.path.clone(),
            attempts: self.policy.max_attempts,
            last: Box::new(last.unwrap_or_else(|| Error::Status {
                status: 0,
                path: request.path.clone(),
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_backs_off_linearly() {
        let policy = RetryPolicy::default();
        let delays: Vec<_> = (0..policy.max_attempts)
            .map(|i| policy.delay_for(i))
            .collect();
        assert_eq!(
            delays,
            vec![
                Duration::ZERO,
                Duration::from_secs(5),
                Duration::from_secs(10)
            ]
        );
    }
}
