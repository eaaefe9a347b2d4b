//! Application context - shared state for request handlers
//!
//! AppContext owns the single process-wide RunState and everything needed
//! to start a run against it. Handlers hold it behind an `Arc`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::publisher::StatusPublisher;
use crate::chain::ChainConnector;
use crate::config::Config;
use crate::domain::{RunState, RunStatus};
use crate::error::{CycleError, Result};
use crate::runner::CycleRunner;

/// Shared context for the control surface and the orchestrator
pub struct AppContext {
    config: Arc<Config>,
    connector: Arc<dyn ChainConnector>,
    state: Arc<watch::Sender<RunState>>,
    /// Cancels the active run; also serializes start and stop
    active: Mutex<Option<CancellationToken>>,
    publisher: StatusPublisher,
}

impl AppContext {
    pub fn new(config: Config, connector: Arc<dyn ChainConnector>) -> Self {
        let (tx, rx) = watch::channel(RunState::idle(config.cycles.default));
        let publisher = StatusPublisher::new(rx, config.server.status_interval());
        Self {
            config: Arc::new(config),
            connector,
            state: Arc::new(tx),
            active: Mutex::new(None),
            publisher,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn publisher(&self) -> &StatusPublisher {
        &self.publisher
    }

    /// Copy of the current RunState
    pub fn snapshot(&self) -> RunState {
        self.state.borrow().clone()
    }

    /// Reset the state and spawn a run.
    ///
    /// Fails with `AlreadyRunning` while a run is starting or running; the
    /// state is left untouched in that case.
    pub fn start_run(&self) -> Result<JoinHandle<RunStatus>> {
        let mut active = self.active();
        let total = self.config.cycles.default;

        let started = self.state.send_if_modified(|state| {
            if state.status.is_active() {
                return false;
            }
            *state = RunState::starting(total);
            true
        });
        if !started {
            log::info!("Start rejected: run already active");
            return Err(CycleError::AlreadyRunning);
        }

        let cancel = CancellationToken::new();
        *active = Some(cancel.clone());
        tracing::info!(cycles = total, "Run requested");

        let runner = CycleRunner::new(self.config.clone(), self.connector.clone(), self.state.clone(), cancel);
        Ok(tokio::spawn(runner.run()))
    }

    /// Cancel the active run at its next suspension point
    pub fn stop_run(&self) -> Result<()> {
        let active = self.active();
        if !self.state.borrow().status.is_active() {
            return Err(CycleError::NotRunning);
        }
        match active.as_ref() {
            Some(cancel) => {
                tracing::info!("Run stop requested");
                cancel.cancel();
                Ok(())
            }
            None => Err(CycleError::NotRunning),
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
