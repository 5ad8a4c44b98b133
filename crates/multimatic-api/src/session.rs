// Session lifecycle: token issuance and re-authentication.
//
// The credentials never leave this module. Other components only ask it
// to log in, or whether a token is held.

use secrecy::SecretString;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::Credentials;
use crate::endpoints;
use crate::error::Error;
use crate::executor::RequestExecutor;
use crate::transport::ApiRequest;

/// Owns the account credentials and performs login.
///
/// Logins are serialized: concurrent callers queue on the credentials lock,
/// so a burst of failing requests cannot race two token requests.
#[derive(Debug)]
pub struct SessionManager {
    credentials: Mutex<Credentials>,
}

impl SessionManager {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Mutex::new(credentials),
        }
    }

    /// Whether a token has been issued to this session.
    pub async fn is_authenticated(&self) -> bool {
        self.credentials.lock().await.has_token()
    }

    pub async fn username(&self) -> String {
        self.credentials.lock().await.username().to_owned()
    }

    /// Log in, collapsing any failure into `false`.
    pub async fn login(&self, executor: &RequestExecutor) -> bool {
        match self.authenticate(executor).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "login failed");
                false
            }
        }
    }

    /// Obtain a token if none is held, then authenticate with it.
    ///
    /// Once a token exists it is never re-requested; only the
    /// `authenticate` call is repeated. Both requests go through the
    /// executor's retry loop but never through its re-login fallback.
    pub async fn authenticate(&self, executor: &RequestExecutor) -> Result<(), Error> {
        let mut credentials = self.credentials.lock().await;

        if !credentials.has_token() {
            let body = credentials
                .token_request_body()
                .ok_or_else(|| Error::Authentication {
                    message: "no token held and password already discarded".into(),
                })?;

            debug!(username = credentials.username(), "requesting new auth token");
            let resp = executor
                .send_with_retries(&ApiRequest::post(endpoints::TOKEN_NEW, body))
                .await
                .map_err(|e| Error::Authentication {
                    message: format!("token request failed: {e}"),
                })?;

            let token = resp
                .body()
                .and_then(|b| b.get("authToken"))
                .and_then(|t| t.as_str())
                .ok_or_else(|| Error::Authentication {
                    message: "token response did not contain an authToken".into(),
                })?;

            credentials.store_token(SecretString::from(token.to_owned()));
            debug!("auth token stored, password discarded");
        }

        let body = credentials
            .authenticate_body()
            .ok_or_else(|| Error::Authentication {
                message: "no auth token available".into(),
            })?;

        executor
            .send_with_retries(&ApiRequest::post(endpoints::AUTHENTICATE, body))
            .await
            .map_err(|e| Error::Authentication {
                message: format!("authenticate rejected: {e}"),
            })?;

        info!(username = credentials.username(), "session authenticated");
        Ok(())
    }
}
