// ── Core error types ──
//
// Errors surfaced by the core crate. Read paths turn these into `None`;
// the explicit forms exist so tests and logs can tell failures apart.

use thiserror::Error;

use multimatic_api::FailureKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API errors ───────────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] multimatic_api::Error),

    // ── Aggregation errors ───────────────────────────────────────────
    /// At least one of the parallel snapshot reads failed.
    #[error("state aggregation for facility {serial} failed: {} unavailable", failed.join(", "))]
    Aggregation {
        serial: String,
        failed: Vec<&'static str>,
    },

    /// All reads succeeded but the system tree could not be indexed.
    #[error("malformed system state: {message}")]
    MalformedState { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Api(e) => e.kind(),
            Self::Aggregation { .. } | Self::MalformedState { .. } => FailureKind::Aggregation,
            Self::Config { .. } => FailureKind::Transport,
        }
    }
}
