// ── Client facade ──
//
// One `Client` = one session: a shared executor, the write queue and the
// state aggregator built on top of it.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use multimatic_api::{Credentials, RequestExecutor, TlsMode, Transport, TransportConfig};

use crate::aggregate::StateAggregator;
use crate::command::{Command, DhwOperationMode, HeatingMode};
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::SystemSnapshot;
use crate::queue::CommandQueue;

/// The main entry point for consumers.
///
/// Cheaply cloneable; clones share the session, the write queue and the
/// cookie jar. Not meant to be shared across processes.
///
/// # Panics
///
/// The `set_*` write methods panic when called outside a Tokio runtime.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    executor: Arc<RequestExecutor>,
    queue: CommandQueue,
    aggregator: StateAggregator,
}

impl Client {
    /// Build a client from configuration. Does not log in; call
    /// [`login()`](Self::login) first.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        if config.credentials.username.trim().is_empty() {
            return Err(CoreError::Config {
                message: "username must not be empty".into(),
            });
        }

        let transport_config = TransportConfig {
            tls: config.ca_cert.clone().map_or(TlsMode::System, TlsMode::CustomCa),
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        let transport = Transport::new(config.base_url.clone(), &transport_config)?;

        let credentials = Credentials::new(
            config.credentials.username.clone(),
            config.credentials.password.clone(),
            config.credentials.smartphone_id.clone(),
        );
        let executor =
            RequestExecutor::new(transport, credentials).with_retry_policy(config.retry);

        Ok(Self::from_executor(Arc::new(executor), config.batch_window))
    }

    /// Assemble a client around an existing executor.
    pub fn from_executor(executor: Arc<RequestExecutor>, batch_window: Duration) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                queue: CommandQueue::new(Arc::clone(&executor), batch_window),
                aggregator: StateAggregator::new(Arc::clone(&executor)),
                executor,
            }),
        }
    }

    /// Direct access to the executor and its single-endpoint reads.
    pub fn executor(&self) -> &RequestExecutor {
        &self.inner.executor
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.inner.queue
    }

    // ── Session ──────────────────────────────────────────────────

    pub async fn login(&self) -> bool {
        self.inner.executor.login().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.executor.session().is_authenticated().await
    }

    // ── Reads ────────────────────────────────────────────────────

    pub async fn get_facilities(&self) -> Option<Vec<Value>> {
        self.inner.executor.get_facilities().await
    }

    pub async fn get_full_state(&self, serial: &str) -> Option<SystemSnapshot> {
        self.inner.aggregator.get_full_state(serial).await
    }

    pub async fn try_get_full_state(&self, serial: &str) -> Result<SystemSnapshot, CoreError> {
        self.inner.aggregator.build(serial).await
    }

    // ── Writes (fire-and-forget) ─────────────────────────────────
    //
    // The set_* methods queue a write and return at once. They arm the
    // drain with `tokio::spawn`, so they must be called from within a
    // Tokio runtime; outside one they panic.

    pub fn set_target_temperature(&self, serial: &str, zone: &str, temperature: f64) {
        self.enqueue(Command::zone_setpoint_temperature(serial, zone, temperature));
    }

    pub fn set_target_reduced_temperature(&self, serial: &str, zone: &str, temperature: f64) {
        self.enqueue(Command::zone_setback_temperature(serial, zone, temperature));
    }

    pub fn set_heating_mode(&self, serial: &str, zone: &str, mode: HeatingMode) {
        self.enqueue(Command::zone_heating_mode(serial, zone, mode));
    }

    pub fn set_target_dhw_temperature(&self, serial: &str, dhw: &str, temperature: f64) {
        self.enqueue(Command::dhw_temperature_setpoint(serial, dhw, temperature));
    }

    pub fn set_dhw_operation_mode(&self, serial: &str, dhw: &str, mode: DhwOperationMode) {
        self.enqueue(Command::dhw_operation_mode(serial, dhw, mode));
    }

    pub fn set_zone_timeprogram(&self, serial: &str, zone: &str, program: Value) {
        self.enqueue(Command::zone_timeprogram(serial, zone, program));
    }

    fn enqueue(&self, command: Command) {
        debug!(path = %command.target, "enqueueing write");
        self.inner.queue.enqueue(command);
    }

    /// Let pending writes go out, e.g. before a short-lived process exits.
    pub async fn wait_idle(&self) {
        self.inner.queue.wait_idle().await;
    }
}
