// ── Runtime client configuration ──
//
// Describes *how* to talk to the multiMATIC service. Carries credentials and
// tuning but never touches disk; multimatic-config (or any caller) builds one
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use multimatic_api::{DEFAULT_BASE_URL, RetryPolicy};

/// Account login material.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub username: String,
    pub password: SecretString,
    /// Client identifier sent with both auth requests.
    pub smartphone_id: String,
}

/// Configuration for one client instance (= one session).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, normally [`DEFAULT_BASE_URL`].
    pub base_url: Url,
    pub credentials: AccountCredentials,
    /// Per-request transport timeout.
    pub timeout: Duration,
    /// Extra CA certificate to trust (PEM).
    pub ca_cert: Option<PathBuf>,
    pub retry: RetryPolicy,
    /// How long the write queue waits before its first drain.
    pub batch_window: Duration,
}

impl ClientConfig {
    /// Config for the production endpoint with default tuning.
    pub fn new(credentials: AccountCredentials) -> Self {
        Self {
            base_url: default_base_url(),
            credentials,
            timeout: Duration::from_secs(30),
            ca_cert: None,
            retry: RetryPolicy::default(),
            batch_window: Duration::from_millis(500),
        }
    }
}

pub fn default_base_url() -> Url {
    #[allow(clippy::expect_used)]
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_timings() {
        let cfg = ClientConfig::new(AccountCredentials {
            username: "u".into(),
            password: SecretString::from("p"),
            smartphone_id: "phone".into(),
        });
        assert_eq!(cfg.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(cfg.batch_window, Duration::from_millis(500));
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.backoff_step, Duration::from_secs(5));
    }
}
