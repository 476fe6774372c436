//! Per-identity session lifecycle.
//!
//! Activating a session associates a user with a ledger (fetching or creating
//! the durable record) and starts the replenishment scheduler; deactivating
//! stops the scheduler before any further tick can fire. Simulators are
//! handed clones of the session's ledger and never touch the balance
//! directly.

use std::sync::Arc;

use playtime_types::UserId;

use crate::ledger::{LedgerConfig, LedgerError, TimeLedger};
use crate::scheduler::{ReplenishScheduler, SchedulerState};
use crate::store::BalanceStore;

pub struct PlayerSession<S> {
    ledger: TimeLedger<S>,
    scheduler: ReplenishScheduler<S>,
}

impl<S: BalanceStore> PlayerSession<S> {
    /// Load (or create) the user's balance record and start replenishment.
    pub async fn activate(
        user: UserId,
        store: Arc<S>,
        config: LedgerConfig,
    ) -> Result<Self, LedgerError> {
        let ledger = TimeLedger::new(user, store, config);
        ledger.load_initial().await?;
        let scheduler = ReplenishScheduler::new(ledger.clone());
        scheduler.start();
        tracing::info!(user = %ledger.user(), balance = ledger.balance(), "session active");
        Ok(Self { ledger, scheduler })
    }

    pub fn ledger(&self) -> &TimeLedger<S> {
        &self.ledger
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Stop replenishment. Idempotent; the session's ledger stays readable.
    pub fn deactivate(&self) {
        self.scheduler.stop();
        tracing::info!(user = %self.ledger.user(), "session inactive");
    }
}
