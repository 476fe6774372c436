//! In-memory collaborators for tests and local demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use playtime_types::{AccountRecord, GameKind, Settlement, UserId};

use crate::recorder::ScoreRecorder;
use crate::store::{BalanceStore, StoreError};

/// In-memory [`BalanceStore`] with switchable fault injection.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<UserId, AccountRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail with a transient error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail with a transient error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Plant a record directly, bypassing the fault switches.
    pub fn seed(&self, user: &UserId, minutes: u64) {
        self.records
            .lock()
            .unwrap()
            .insert(user.clone(), AccountRecord::new(minutes));
    }

    /// Inspect the stored balance.
    pub fn stored(&self, user: &UserId) -> Option<u64> {
        self.records
            .lock()
            .unwrap()
            .get(user)
            .map(|record| record.available_minutes)
    }
}

impl BalanceStore for MemoryStore {
    async fn get(&self, user: &UserId) -> Result<Option<AccountRecord>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        Ok(self.records.lock().unwrap().get(user).copied())
    }

    async fn set(&self, user: &UserId, record: AccountRecord) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        self.records.lock().unwrap().insert(user.clone(), record);
        Ok(())
    }

    async fn upsert_if_absent(
        &self,
        user: &UserId,
        initial: AccountRecord,
    ) -> Result<AccountRecord, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        let mut records = self.records.lock().unwrap();
        Ok(*records.entry(user.clone()).or_insert(initial))
    }
}

/// In-memory [`ScoreRecorder`] capturing every settlement.
#[derive(Default)]
pub struct MemoryRecorder {
    records: Mutex<Vec<(GameKind, UserId, Settlement)>>,
    fail: AtomicBool,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn recorded(&self) -> Vec<(GameKind, UserId, Settlement)> {
        self.records.lock().unwrap().clone()
    }
}

impl ScoreRecorder for MemoryRecorder {
    async fn record(
        &self,
        game: GameKind,
        user: &UserId,
        settlement: Settlement,
    ) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected recorder failure".into()));
        }
        self.records
            .lock()
            .unwrap()
            .push((game, user.clone(), settlement));
        Ok(())
    }
}
