use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::MAX_BALANCE;

/// Opaque identity key for ledger records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum AccountInvariantError {
    #[error("balance above cap (got={got}, max={max})")]
    BalanceAboveCap { got: u64, max: u64 },
}

/// Remote-store mirror of a user's banked minutes.
///
/// Eventually consistent with the ledger's cached balance; the ledger is the
/// source of truth for the current value while a sync is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub available_minutes: u64,
}

impl AccountRecord {
    pub fn new(available_minutes: u64) -> Self {
        Self { available_minutes }
    }

    pub fn validate(&self) -> Result<(), AccountInvariantError> {
        if self.available_minutes > MAX_BALANCE {
            return Err(AccountInvariantError::BalanceAboveCap {
                got: self.available_minutes,
                max: MAX_BALANCE,
            });
        }
        Ok(())
    }
}
