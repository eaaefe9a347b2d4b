//! Status publisher - fans the run snapshot out to observers
//!
//! Each subscription gets the current snapshot immediately, then a fresh
//! copy on every tick and on every change. Subscriptions are independent:
//! dropping one stream affects nobody else.

use std::time::Duration;

use futures::Stream;
use futures::stream;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::domain::RunState;

#[derive(Debug, Clone)]
pub struct StatusPublisher {
    rx: watch::Receiver<RunState>,
    period: Duration,
}

impl StatusPublisher {
    pub fn new(rx: watch::Receiver<RunState>, period: Duration) -> Self {
        Self { rx, period }
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> RunState {
        self.rx.borrow().clone()
    }

    /// Stream of snapshots for one observer. Ends only if the state owner is gone.
    pub fn subscribe(&self) -> impl Stream<Item = RunState> + Send + use<> {
        let rx = self.rx.clone();
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        stream::unfold((rx, ticker, true), |(mut rx, mut ticker, first)| async move {
            if !first {
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = rx.changed() => changed.ok()?,
                }
            }
            let snapshot = rx.borrow_and_update().clone();
            Some((snapshot, (rx, ticker, false)))
        })
    }
}
