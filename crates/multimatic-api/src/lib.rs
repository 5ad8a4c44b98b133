// multimatic-api: Async Rust client for the Vaillant multiMATIC cloud API
//
// Transport, endpoint paths, session handling and the retrying executor.
// Higher-level pieces (write queue, state snapshots) live in multimatic-core.

pub mod auth;
pub mod clock;
pub mod endpoints;
pub mod error;
pub mod executor;
pub mod facility;
pub mod session;
pub mod transport;

pub use auth::Credentials;
pub use clock::{Clock, RecordingClock, TokioClock};
pub use error::{Error, FailureKind};
pub use executor::{RequestExecutor, RetryPolicy};
pub use session::SessionManager;
pub use transport::{
    ApiRequest, ApiResponse, DEFAULT_BASE_URL, TlsMode, Transport, TransportConfig,
};

pub use reqwest::Method;
