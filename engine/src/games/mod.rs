//! Game-outcome simulators.
//!
//! Each simulator owns one game's state machine, charges the ledger when a
//! round (or session) starts, and emits exactly one [`Settlement`] per
//! completed round on its event channel. Insufficient credit is surfaced
//! before any timer starts; a persistence failure never aborts a round
//! already in progress, because the round either consumed the optimistic
//! credit or it never started.

pub mod escalator;
pub mod reels;
pub mod registry;
pub mod rng;
pub mod wheel;

#[cfg(test)]
mod integration_tests;

use playtime_types::{GameKind, Settlement};
use thiserror::Error as ThisError;

use crate::ledger::LedgerError;

/// Errors surfaced by simulator operations.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum GameError {
    /// The ledger rejected the round charge. Recoverable: wait for
    /// replenishment or pick a cheaper game.
    #[error("insufficient play-time credit")]
    InsufficientCredit,
    /// Stakes and bet amounts must be positive.
    #[error("invalid bet: amount must be greater than zero")]
    InvalidBet,
    /// The cash-out lost the race: the multiplier had already reached the
    /// crash threshold.
    #[error("cash-out rejected: round already crashed")]
    CrashPreempted,
    /// The operation does not apply to the simulator's current phase.
    #[error("invalid transition: {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Round lifecycle notifications published by the simulators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEvent {
    /// Exactly one per completed round.
    Settled {
        game: GameKind,
        settlement: Settlement,
    },
}
