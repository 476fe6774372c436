//! Time-credit ledger.
//!
//! Owns the authoritative in-process balance for one user and synchronizes it
//! with a remote [`BalanceStore`]. Mutations follow an optimistic contract:
//! the cached balance moves first so callers can gate a round without waiting
//! on the network, and the durable write runs in a background task.
//!
//! Debits and credits degrade differently on persistence errors. A failed
//! debit write compensates the cache back to its pre-debit value; a failed
//! credit write is logged and the local grant stands. Under-granting is the
//! recoverable failure mode (the next replenishment or `refresh` converges),
//! over-debiting would wrongly deny play.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use playtime_types::{
    AccountRecord, UserId, INITIAL_BALANCE, MAX_BALANCE, REPLENISH_AMOUNT, REPLENISH_PERIOD_SECS,
};
use thiserror::Error as ThisError;
use tokio::sync::watch;

use crate::store::{BalanceStore, StoreError};

/// Ledger tunables. Defaults mirror the platform constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    pub initial_balance: u64,
    pub max_balance: u64,
    pub replenish_amount: u64,
    pub replenish_period: Duration,
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_balance == 0 {
            return Err("max_balance must be greater than zero");
        }
        if self.initial_balance > self.max_balance {
            return Err("initial_balance must not exceed max_balance");
        }
        if self.replenish_amount == 0 {
            return Err("replenish_amount must be greater than zero");
        }
        if self.replenish_period.is_zero() {
            return Err("replenish_period must be greater than zero");
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_balance: INITIAL_BALANCE,
            max_balance: MAX_BALANCE,
            replenish_amount: REPLENISH_AMOUNT,
            replenish_period: Duration::from_secs(REPLENISH_PERIOD_SECS),
        }
    }
}

/// Outcome of a debit attempt against the cached balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebitOutcome {
    /// The cached balance covered the amount and was decremented.
    Accepted,
    /// The amount exceeded the cached balance; nothing changed.
    Rejected,
}

impl DebitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DebitOutcome::Accepted)
    }
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum LedgerError {
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-user time-credit ledger.
///
/// Cheap to clone; clones share the same cached balance and store handle.
/// Cache mutations are serialized by an internal mutex whose critical
/// sections never await.
pub struct TimeLedger<S> {
    user: UserId,
    config: LedgerConfig,
    store: Arc<S>,
    cached: Arc<Mutex<u64>>,
    updates: watch::Sender<u64>,
}

impl<S> Clone for TimeLedger<S> {
    fn clone(&self) -> Self {
        Self {
            user: self.user.clone(),
            config: self.config,
            store: Arc::clone(&self.store),
            cached: Arc::clone(&self.cached),
            updates: self.updates.clone(),
        }
    }
}

impl<S: BalanceStore> TimeLedger<S> {
    /// Create a ledger for `user` with the cache seeded at
    /// `config.initial_balance`. Call [`TimeLedger::load_initial`] to adopt
    /// the durable record.
    pub fn new(user: UserId, store: Arc<S>, config: LedgerConfig) -> Self {
        let (updates, _) = watch::channel(config.initial_balance);
        Self {
            user,
            config,
            store,
            cached: Arc::new(Mutex::new(config.initial_balance)),
            updates,
        }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Cached balance. Never blocks on the store, never fails.
    pub fn balance(&self) -> u64 {
        *self.cached.lock().unwrap()
    }

    /// Balance update notifications. The receiver holds the current value and
    /// observes every mutation thereafter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates.subscribe()
    }

    /// Attempt to spend `amount` minutes, all-or-nothing.
    ///
    /// On [`DebitOutcome::Accepted`] the cache is decremented immediately and
    /// the durable write runs in the background; if that write fails the
    /// cache is compensated back to its pre-debit value. Callers that already
    /// proceeded on the optimistic success are not retroactively notified;
    /// the inconsistency window closes on the next read.
    pub fn debit(&self, amount: u64) -> Result<DebitOutcome, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let new_balance = {
            let mut cached = self.cached.lock().unwrap();
            if amount > *cached {
                return Ok(DebitOutcome::Rejected);
            }
            *cached -= amount;
            self.updates.send_replace(*cached);
            *cached
        };
        self.persist_debit(amount, new_balance);
        Ok(DebitOutcome::Accepted)
    }

    fn persist_debit(&self, amount: u64, new_balance: u64) {
        let store = Arc::clone(&self.store);
        let user = self.user.clone();
        let cached = Arc::clone(&self.cached);
        let updates = self.updates.clone();
        let max = self.config.max_balance;
        tokio::spawn(async move {
            if let Err(err) = store.set(&user, AccountRecord::new(new_balance)).await {
                tracing::warn!(user = %user, amount, "debit persistence failed, reverting: {err}");
                let mut cached = cached.lock().unwrap();
                *cached = cached.saturating_add(amount).min(max);
                updates.send_replace(*cached);
            }
        });
    }

    /// Grant `amount` minutes, clamped to the cap; overflow beyond the cap is
    /// discarded, not carried over.
    ///
    /// The durable write is best-effort: a failure is logged and the local
    /// grant stands.
    pub fn credit(&self, amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let new_balance = {
            let mut cached = self.cached.lock().unwrap();
            *cached = cached.saturating_add(amount).min(self.config.max_balance);
            self.updates.send_replace(*cached);
            *cached
        };
        self.persist_credit(new_balance);
        Ok(())
    }

    fn persist_credit(&self, new_balance: u64) {
        let store = Arc::clone(&self.store);
        let user = self.user.clone();
        tokio::spawn(async move {
            if let Err(err) = store.set(&user, AccountRecord::new(new_balance)).await {
                tracing::warn!(user = %user, "credit persistence failed, grant stands: {err}");
            }
        });
    }

    /// Scheduled grant; sole caller is the replenishment scheduler.
    pub fn replenish(&self) -> Result<(), LedgerError> {
        self.credit(self.config.replenish_amount)
    }

    /// Fetch-or-create the durable record and adopt its value.
    ///
    /// Idempotent on the identity key: concurrent initialization converges on
    /// one record and the second caller observes the first's value.
    pub async fn load_initial(&self) -> Result<u64, LedgerError> {
        let stored = self
            .store
            .upsert_if_absent(&self.user, AccountRecord::new(self.config.initial_balance))
            .await?;
        Ok(self.adopt(stored))
    }

    /// Force-reload the cache from the remote store, overwriting any local
    /// value. Used to reconcile after detected drift; a missing record falls
    /// back to initialization.
    pub async fn refresh(&self) -> Result<u64, LedgerError> {
        match self.store.get(&self.user).await? {
            Some(record) => Ok(self.adopt(record)),
            None => self.load_initial().await,
        }
    }

    fn adopt(&self, record: AccountRecord) -> u64 {
        if let Err(err) = record.validate() {
            tracing::warn!(user = %self.user, "stored record out of range, clamping: {err}");
        }
        let mut cached = self.cached.lock().unwrap();
        *cached = record.available_minutes.min(self.config.max_balance);
        self.updates.send_replace(*cached);
        *cached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MemoryStore;

    fn ledger_with(balance: u64, store: Arc<MemoryStore>) -> TimeLedger<MemoryStore> {
        let config = LedgerConfig {
            initial_balance: balance,
            ..LedgerConfig::default()
        };
        TimeLedger::new(UserId::new("tester"), store, config)
    }

    /// Let spawned persistence tasks run to completion.
    async fn drain_tasks() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn debit_rejected_when_amount_exceeds_balance() {
        let ledger = ledger_with(10, Arc::new(MemoryStore::new()));
        assert_eq!(ledger.debit(11).unwrap(), DebitOutcome::Rejected);
        assert_eq!(ledger.balance(), 10);
    }

    #[tokio::test]
    async fn debit_decrements_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger_with(120, Arc::clone(&store));
        assert_eq!(ledger.debit(5).unwrap(), DebitOutcome::Accepted);
        assert_eq!(ledger.balance(), 115);
        drain_tasks().await;
        assert_eq!(store.stored(ledger.user()), Some(115));
    }

    #[tokio::test]
    async fn debit_rolls_back_on_persistence_failure() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let ledger = ledger_with(120, Arc::clone(&store));
        assert_eq!(ledger.debit(5).unwrap(), DebitOutcome::Accepted);
        assert_eq!(ledger.balance(), 115);
        drain_tasks().await;
        // Restored exactly to the pre-debit value.
        assert_eq!(ledger.balance(), 120);
    }

    #[tokio::test]
    async fn debit_of_zero_is_an_invariant_error() {
        let ledger = ledger_with(120, Arc::new(MemoryStore::new()));
        assert!(matches!(ledger.debit(0), Err(LedgerError::ZeroAmount)));
    }

    #[tokio::test]
    async fn credit_clamps_to_cap() {
        let ledger = ledger_with(470, Arc::new(MemoryStore::new()));
        ledger.credit(20).unwrap();
        assert_eq!(ledger.balance(), 480);
    }

    #[tokio::test]
    async fn credit_never_reduces_and_never_exceeds_cap() {
        let ledger = ledger_with(100, Arc::new(MemoryStore::new()));
        ledger.credit(u64::MAX).unwrap();
        assert_eq!(ledger.balance(), MAX_BALANCE);
        ledger.credit(1).unwrap();
        assert_eq!(ledger.balance(), MAX_BALANCE);
    }

    #[tokio::test]
    async fn credit_failure_keeps_local_grant() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let ledger = ledger_with(100, Arc::clone(&store));
        ledger.credit(10).unwrap();
        drain_tasks().await;
        assert_eq!(ledger.balance(), 110);
        assert_eq!(store.stored(ledger.user()), None);
    }

    #[tokio::test]
    async fn balance_stays_in_bounds_across_sequences() {
        let ledger = ledger_with(120, Arc::new(MemoryStore::new()));
        let ops: [(bool, u64); 8] = [
            (true, 50),
            (false, 400),
            (true, 480),
            (false, 479),
            (true, 30),
            (false, 3),
            (false, 4),
            (false, 5),
        ];
        for (is_credit, amount) in ops {
            if is_credit {
                ledger.credit(amount).unwrap();
            } else {
                let _ = ledger.debit(amount).unwrap();
            }
            assert!(ledger.balance() <= MAX_BALANCE);
        }
    }

    #[tokio::test]
    async fn load_initial_creates_record_once() {
        let store = Arc::new(MemoryStore::new());
        let first = ledger_with(INITIAL_BALANCE, Arc::clone(&store));
        assert_eq!(first.load_initial().await.unwrap(), INITIAL_BALANCE);
        assert_eq!(store.stored(first.user()), Some(INITIAL_BALANCE));

        // A second association observes the first record, not a fresh one.
        first.debit(20).unwrap();
        drain_tasks().await;
        let second = ledger_with(INITIAL_BALANCE, Arc::clone(&store));
        assert_eq!(second.load_initial().await.unwrap(), 100);
    }

    #[tokio::test]
    async fn refresh_overwrites_local_value() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger_with(120, Arc::clone(&store));
        ledger.load_initial().await.unwrap();
        store.seed(ledger.user(), 200);
        assert_eq!(ledger.refresh().await.unwrap(), 200);
        assert_eq!(ledger.balance(), 200);
    }

    #[tokio::test]
    async fn refresh_clamps_an_out_of_range_record() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger_with(120, Arc::clone(&store));
        store.seed(ledger.user(), 600);
        assert_eq!(ledger.refresh().await.unwrap(), MAX_BALANCE);
    }

    #[tokio::test]
    async fn refresh_reinitializes_a_missing_record() {
        let store = Arc::new(MemoryStore::new());
        let ledger = ledger_with(120, Arc::clone(&store));
        assert_eq!(ledger.refresh().await.unwrap(), INITIAL_BALANCE);
        assert_eq!(store.stored(ledger.user()), Some(INITIAL_BALANCE));
    }

    #[test]
    fn config_validation_rejects_degenerate_settings() {
        assert!(LedgerConfig::default().validate().is_ok());
        let inverted = LedgerConfig {
            initial_balance: 500,
            max_balance: 480,
            ..LedgerConfig::default()
        };
        assert!(inverted.validate().is_err());
        let idle = LedgerConfig {
            replenish_amount: 0,
            ..LedgerConfig::default()
        };
        assert!(idle.validate().is_err());
    }

    #[tokio::test]
    async fn subscribers_observe_mutations() {
        let ledger = ledger_with(120, Arc::new(MemoryStore::new()));
        let mut updates = ledger.subscribe();
        assert_eq!(*updates.borrow_and_update(), 120);
        ledger.debit(5).unwrap();
        assert!(updates.has_changed().unwrap());
        assert_eq!(*updates.borrow_and_update(), 115);
    }
}
