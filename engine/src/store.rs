//! Remote balance persistence.

use std::future::Future;

use playtime_types::{AccountRecord, UserId};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum StoreError {
    /// Transient failure talking to the remote store.
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
}

/// Durable mirror of per-user balance records.
///
/// The ledger treats every error as transient: a failed debit write is
/// compensated locally, a failed credit write is logged and dropped. The
/// mirror is eventually consistent, bounded by one round trip.
pub trait BalanceStore: Send + Sync + 'static {
    /// Fetch the stored record, `None` when no record exists.
    fn get(&self, user: &UserId)
        -> impl Future<Output = Result<Option<AccountRecord>, StoreError>> + Send;

    /// Overwrite the stored record.
    fn set(&self, user: &UserId, record: AccountRecord)
        -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Create the record at `initial` if absent and return the stored record
    /// either way. Must be atomic on the identity key so that concurrent
    /// initialization converges on a single record.
    fn upsert_if_absent(&self, user: &UserId, initial: AccountRecord)
        -> impl Future<Output = Result<AccountRecord, StoreError>> + Send;
}
