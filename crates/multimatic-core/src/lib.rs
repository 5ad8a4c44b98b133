//! Write queue, facility snapshots and the client facade on top of
//! `multimatic-api`.
//!
//! - **[`Client`]**: one session: login, reads, fire-and-forget writes.
//! - **[`CommandQueue`]**: coalesces writes per target and sends them one
//!   at a time after a short batching window.
//! - **[`StateAggregator`]**: reads system, live report, status and gateway
//!   in parallel and merges them into a [`SystemSnapshot`], all or nothing.

pub mod aggregate;
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod queue;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::StateAggregator;
pub use client::Client;
pub use command::{Command, DhwOperationMode, HeatingMode};
pub use config::{AccountCredentials, ClientConfig};
pub use error::CoreError;
pub use model::{SystemSnapshot, SystemTree};
pub use queue::{CommandQueue, QueueState};

pub use multimatic_api::{FailureKind, RetryPolicy};
