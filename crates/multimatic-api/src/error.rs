use thiserror::Error;

/// Coarse classification of a failure, independent of its concrete cause.
///
/// Read paths collapse every failure into `None`; this is what tests and
/// logs use to tell the cases apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Non-200 status or network error on a request attempt.
    Transport,
    /// Token issuance or re-authentication rejected or unreachable.
    Auth,
    /// One or more of the parallel snapshot reads failed.
    Aggregation,
}

/// Top-level error type for the `multimatic-api` crate.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token issuance or re-authentication failed.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with something other than HTTP 200.
    #[error("HTTP {status} from {path}")]
    Status { status: u16, path: String },

    /// Every attempt of a request failed.
    #[error("{path} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        path: String,
        attempts: u32,
        last: Box<Error>,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// A 200 response whose JSON lacked the `body` member the caller needed.
    #[error("Response from {path} has no `{member}` member")]
    MissingBody { path: String, member: &'static str },
}

impl Error {
    /// Classify this error as a transport or an authentication failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Authentication { .. } => FailureKind::Auth,
            Self::RetriesExhausted { last, .. } => last.kind(),
            _ => FailureKind::Transport,
        }
    }

    /// Returns `true` if re-authenticating could plausibly fix this.
    pub fn is_auth_failure(&self) -> bool {
        self.kind() == FailureKind::Auth
    }

    /// HTTP status of the failing response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}
