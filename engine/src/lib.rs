//! Playtime engine.
//!
//! This crate contains the stateful core of the platform: the time-credit
//! ledger, its replenishment scheduler, and the three game-outcome
//! simulators (Escalator, WheelDraw, ReelMachine).
//!
//! ## Concurrency model
//! All state is owned per user session. Cached-ledger and round state sit
//! behind mutexes whose critical sections never await, so operations are
//! linearized: debits, credits and round transitions never interleave
//! mid-mutation. Anything that takes real time (timers, remote persistence)
//! runs as a spawned task and re-acquires the lock when it fires.
//!
//! ## Timer liveness
//! Scheduled work (multiplier ticks, wheel settling, replenishment) is keyed
//! by a generation counter or liveness flag checked under the lock before the
//! effect applies. Cancelling a round or stopping the scheduler is therefore
//! effective even against a tick that was already in flight.

pub mod games;
pub mod ledger;
pub mod recorder;
pub mod scheduler;
pub mod session;
pub mod store;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use games::escalator::{Escalator, EscalatorPhase};
pub use games::reels::{ReelMachine, ReelsPhase, SpinTier};
pub use games::registry::{
    EscalatorConfig, GameConfig, GameInfo, GameRegistry, ReelsConfig, WheelConfig,
};
pub use games::rng::OutcomeRng;
pub use games::wheel::{BetCategory, WheelBet, WheelDraw, WheelPhase};
pub use games::{GameError, RoundEvent};
pub use ledger::{DebitOutcome, LedgerConfig, LedgerError, TimeLedger};
pub use recorder::ScoreRecorder;
pub use scheduler::{ReplenishScheduler, SchedulerState};
pub use session::PlayerSession;
pub use store::{BalanceStore, StoreError};
