// ── Coalescing write queue ──
//
// Writes are buffered, same-target writes collapse to the newest payload,
// and a single drain task sends them one at a time after a short batching
// window. Callers get no completion signal; failures only show up in logs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use multimatic_api::{Clock, RequestExecutor};

use crate::command::Command;

/// Scheduling state of a [`CommandQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Nothing pending, no drain armed.
    Idle,
    /// A drain is armed and waiting out the batching window.
    Scheduled,
    /// A drain is sending commands.
    Draining,
}

struct Pending {
    commands: VecDeque<Command>,
    state: QueueState,
}

struct Shared {
    executor: Arc<RequestExecutor>,
    clock: Arc<dyn Clock>,
    batch_window: Duration,
    // Commands and state change together under this lock; a drain can
    // only go Idle when it saw the queue empty.
    pending: Mutex<Pending>,
    state_tx: watch::Sender<QueueState>,
}

/// Fire-and-forget write queue. Cheap to clone; clones share one queue.
#[derive(Clone)]
pub struct CommandQueue {
    shared: Arc<Shared>,
}

impl CommandQueue {
    /// Create a queue draining through `executor`, timed by the executor's clock.
    pub fn new(executor: Arc<RequestExecutor>, batch_window: Duration) -> Self {
        let clock = executor.clock();
        let (state_tx, _) = watch::channel(QueueState::Idle);
        Self {
            shared: Arc::new(Shared {
                executor,
                clock,
                batch_window,
                pending: Mutex::new(Pending {
                    commands: VecDeque::new(),
                    state: QueueState::Idle,
                }),
                state_tx,
            }),
        }
    }

    /// Queue a write.
    ///
    /// A pending command with the same target is replaced in place, keeping
    /// its position. If the queue was idle, one drain is armed to run after
    /// the batching window. Must be called from within a Tokio runtime.
    pub fn enqueue(&self, command: Command) {
        let arm = {
            let mut pending = self.shared.lock();

            if let Some(slot) = pending
                .commands
                .iter_mut()
                .find(|c| c.target == command.target)
            {
                info!(path = %command.target, "similar command pending, replacing");
                *slot = command;
            } else {
                debug!(path = %command.target, "command queued");
                pending.commands.push_back(command);
            }

            if pending.state == QueueState::Idle {
                self.shared.transition(&mut pending, QueueState::Scheduled);
                true
            } else {
                false
            }
        };

        if arm {
            let shared = Arc::clone(&self.shared);
            tokio::spawn(async move {
                shared.clock.sleep(shared.batch_window).await;
                shared.drain().await;
            });
        }
    }

    pub fn state(&self) -> QueueState {
        *self.shared.state_tx.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<QueueState> {
        self.shared.state_tx.subscribe()
    }

    /// Commands not yet picked up by a drain, in send order.
    pub fn pending(&self) -> Vec<Command> {
        self.shared.lock().commands.iter().cloned().collect()
    }

    /// Resolve once the queue has nothing pending and no drain running.
    ///
    /// This observes the queue as a whole; it says nothing about whether
    /// any particular command succeeded.
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|state| *state == QueueState::Idle).await;
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, pending: &mut Pending, state: QueueState) {
        pending.state = state;
        self.state_tx.send_replace(state);
    }

    /// Send queued commands one by one until none are left, then go Idle.
    ///
    /// Commands queued while this runs are picked up by the same loop.
    async fn drain(&self) {
        {
            let mut pending = self.lock();
            self.transition(&mut pending, QueueState::Draining);
        }

        loop {
            let command = {
                let mut pending = self.lock();
                match pending.commands.pop_front() {
                    Some(command) => command,
                    None => {
                        self.transition(&mut pending, QueueState::Idle);
                        break;
                    }
                }
            };

            info!(path = %command.target, "processing command");
            if self.executor.query(&command.to_request()).await.is_none() {
                warn!(path = %command.target, "command failed, dropping it");
            }
        }

        debug!("command queue drained");
    }
}
