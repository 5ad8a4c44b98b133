//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use multimatic_config::ConfigError;
use multimatic_core::{CoreError, FailureKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Request to the multiMATIC service failed: {what}")]
    #[diagnostic(
        code(multimatic::request_failed),
        help(
            "The request was retried and a fresh login attempted.\n\
             Check connectivity, then rerun with -vv to see each attempt."
        )
    )]
    RequestFailed { what: String },

    #[error("Facility state unavailable")]
    #[diagnostic(
        code(multimatic::state_unavailable),
        help("Rerun with -v to see which of the facility reads failed.")
    )]
    StateUnavailable {
        #[source]
        source: CoreError,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for profile '{profile}'")]
    #[diagnostic(
        code(multimatic::auth_failed),
        help(
            "Verify username and password.\n\
             The password is read from the profile's password_env variable,\n\
             then MULTIMATIC_PASSWORD, then the profile's password field."
        )
    )]
    AuthFailed { profile: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(multimatic::no_credentials),
        help(
            "Add it to the profile in the config file\n\
             or set MULTIMATIC_USERNAME / MULTIMATIC_PASSWORD."
        )
    )]
    NoCredentials { profile: String, what: &'static str },

    // ── Facility ─────────────────────────────────────────────────────
    #[error("No facility selected")]
    #[diagnostic(
        code(multimatic::no_facility),
        help(
            "The account has {count} facilities. Pick one with --facility\n\
             or set `facility` in the profile. Run: multimatic facilities"
        )
    )]
    NoFacility { count: usize },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(multimatic::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(multimatic::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(multimatic::profile_not_found),
        help("Add a [profiles.{name}] table to {path}")
    )]
    ProfileNotFound { name: String, path: String },

    #[error(transparent)]
    #[diagnostic(code(multimatic::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(multimatic::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RequestFailed { .. } | Self::StateUnavailable { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::NoFacility { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error mapping ───────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match (err.kind(), err) {
            (_, CoreError::Config { message }) => CliError::Validation {
                field: "profile".into(),
                reason: message,
            },
            (FailureKind::Auth, _) => CliError::AuthFailed {
                profile: "current".into(),
            },
            (FailureKind::Aggregation, source) => CliError::StateUnavailable { source },
            (FailureKind::Transport, source) => CliError::RequestFailed {
                what: source.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile, what } => {
                CliError::NoCredentials { profile, what }
            }
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
