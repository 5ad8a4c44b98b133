// ── Full-state aggregation ──
//
// Four independent reads run concurrently and are merged into one
// `SystemSnapshot`. All or nothing: a single failed read discards the rest.

use std::sync::Arc;

use tracing::{debug, warn};

use multimatic_api::RequestExecutor;

use crate::error::CoreError;
use crate::model::SystemSnapshot;

/// Builds facility snapshots from parallel reads.
#[derive(Clone)]
pub struct StateAggregator {
    executor: Arc<RequestExecutor>,
}

impl StateAggregator {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Snapshot of a facility, or `None` if any part of it could not be read.
    pub async fn get_full_state(&self, serial: &str) -> Option<SystemSnapshot> {
        match self.build(serial).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(serial, kind = ?e.kind(), error = %e, "full state unavailable");
                None
            }
        }
    }

    /// Like [`get_full_state`](Self::get_full_state), but says what went wrong.
    pub async fn build(&self, serial: &str) -> Result<SystemSnapshot, CoreError> {
        debug!(serial, "fetching full state");

        let (system, measures, status, gateway) = tokio::join!(
            self.executor.get_full_system(serial),
            self.executor.get_live_report(serial),
            self.executor.get_status(serial),
            self.executor.get_gateway(serial),
        );

        match (system, measures, status, gateway) {
            (Some(system), Some(measures), Some(status), Some(gateway)) => {
                SystemSnapshot::assemble(system, measures, status, gateway)
            }
            (system, measures, status, gateway) => {
                let failed = [
                    ("system", system.is_none()),
                    ("measures", measures.is_none()),
                    ("status", status.is_none()),
                    ("gateway", gateway.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect();

                Err(CoreError::Aggregation {
                    serial: serial.to_owned(),
                    failed,
                })
            }
        }
    }
}
