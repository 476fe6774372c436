//! Periodic balance replenishment.
//!
//! One scheduler per active identity. While running it grants the configured
//! amount once per period, sequentially, so at most one replenishment is in
//! flight at a time. Stopping is immediate and total: the liveness flag flips
//! before the timer task is aborted, so a tick that already fired observes
//! the flag and does nothing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::ledger::TimeLedger;
use crate::store::BalanceStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

struct RunningTask {
    alive: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Recurring replenishment timer, owned by a session lifecycle.
pub struct ReplenishScheduler<S> {
    ledger: TimeLedger<S>,
    task: Mutex<Option<RunningTask>>,
}

impl<S> ReplenishScheduler<S> {
    pub fn state(&self) -> SchedulerState {
        if self.task.lock().unwrap().is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// Stop immediately. Any already-scheduled tick becomes a no-op.
    /// Idempotent.
    pub fn stop(&self) {
        if let Some(running) = self.task.lock().unwrap().take() {
            running.alive.store(false, Ordering::SeqCst);
            running.handle.abort();
        }
    }
}

impl<S: BalanceStore> ReplenishScheduler<S> {
    pub fn new(ledger: TimeLedger<S>) -> Self {
        Self {
            ledger,
            task: Mutex::new(None),
        }
    }

    /// Start the periodic grant. No-op when already running.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap();
        if task.is_some() {
            return;
        }
        let alive = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&alive);
        let ledger = self.ledger.clone();
        let period = ledger.config().replenish_period;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                // Stop may have raced this tick; the flag wins.
                if !flag.load(Ordering::SeqCst) {
                    break;
                }
                if let Err(err) = ledger.replenish() {
                    tracing::warn!(user = %ledger.user(), "replenishment failed: {err}");
                }
            }
        });
        *task = Some(RunningTask { alive, handle });
    }
}

impl<S> Drop for ReplenishScheduler<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use playtime_types::UserId;

    use super::*;
    use crate::ledger::LedgerConfig;
    use crate::mocks::MemoryStore;

    const PERIOD: Duration = Duration::from_secs(3600);

    fn scheduler_with(balance: u64) -> ReplenishScheduler<MemoryStore> {
        let config = LedgerConfig {
            initial_balance: balance,
            ..LedgerConfig::default()
        };
        let ledger = TimeLedger::new(UserId::new("timer"), Arc::new(MemoryStore::new()), config);
        ReplenishScheduler::new(ledger)
    }

    async fn advance(duration: Duration) {
        // Let the freshly spawned timer task anchor its interval before the
        // clock moves.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        tokio::time::advance(duration).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn grants_once_per_period() {
        let scheduler = scheduler_with(0);
        scheduler.start();
        assert_eq!(scheduler.state(), SchedulerState::Running);
        assert_eq!(scheduler.ledger.balance(), 0);

        advance(PERIOD).await;
        assert_eq!(scheduler.ledger.balance(), 10);

        advance(PERIOD).await;
        advance(PERIOD).await;
        assert_eq!(scheduler.ledger.balance(), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn grants_clamp_at_cap() {
        let scheduler = scheduler_with(475);
        scheduler.start();
        advance(PERIOD).await;
        assert_eq!(scheduler.ledger.balance(), 480);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_grants() {
        let scheduler = scheduler_with(0);
        scheduler.start();
        advance(PERIOD).await;
        assert_eq!(scheduler.ledger.balance(), 10);

        scheduler.stop();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        advance(PERIOD).await;
        advance(PERIOD).await;
        assert_eq!(scheduler.ledger.balance(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_beats_an_already_scheduled_tick() {
        let scheduler = scheduler_with(0);
        scheduler.start();
        // Stop before the first tick ever fires.
        scheduler.stop();
        advance(PERIOD).await;
        assert_eq!(scheduler.ledger.balance(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent_while_running() {
        let scheduler = scheduler_with(0);
        scheduler.start();
        scheduler.start();
        advance(PERIOD).await;
        // A duplicate start must not double the cadence.
        assert_eq!(scheduler.ledger.balance(), 10);
    }
}
