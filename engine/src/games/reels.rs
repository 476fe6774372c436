//! ReelMachine: three reels, tiered payouts, session-scoped charging.
//!
//! Lifecycle: `Idle -> Spinning -> Resolved`, with Resolved persisting until
//! the session ends. The charge applies once per session, on the first spin;
//! later spins are free and the score accumulates until `end()` settles it.
//!
//! Payout tiers, in precedence order: all three symbols equal, exactly two
//! equal (any pairing), otherwise participation. The tiers are mutually
//! exclusive and exhaustive over all draws.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use playtime_types::{GameKind, Settlement};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time;

use crate::games::registry::ReelsConfig;
use crate::games::rng::OutcomeRng;
use crate::games::{GameError, RoundEvent};
use crate::ledger::{DebitOutcome, TimeLedger};
use crate::store::BalanceStore;

/// Payout tier for one spin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinTier {
    Jackpot,
    Pair,
    Participation,
}

/// Classify a draw into its payout tier.
pub fn classify(symbols: [u8; 3]) -> SpinTier {
    let [a, b, c] = symbols;
    if a == b && b == c {
        SpinTier::Jackpot
    } else if a == b || b == c || a == c {
        SpinTier::Pair
    } else {
        SpinTier::Participation
    }
}

impl ReelsConfig {
    /// Points awarded for a tier under this configuration.
    pub fn points(&self, tier: SpinTier) -> u64 {
        match tier {
            SpinTier::Jackpot => self.jackpot_points,
            SpinTier::Pair => self.pair_points,
            SpinTier::Participation => self.participation_points,
        }
    }
}

/// Observable machine phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReelsPhase {
    Idle,
    Spinning,
    /// Reels at rest inside a charged session; further spins are free.
    Resolved,
}

impl ReelsPhase {
    fn as_str(&self) -> &'static str {
        match self {
            ReelsPhase::Idle => "idle",
            ReelsPhase::Spinning => "spinning",
            ReelsPhase::Resolved => "resolved",
        }
    }
}

struct ReelsState {
    phase: ReelsPhase,
    generation: u64,
    accumulated: u64,
    /// Symbols and points of the most recent resolved spin.
    last_spin: Option<([u8; 3], u64)>,
    rng: OutcomeRng,
}

pub struct ReelMachine<S> {
    ledger: TimeLedger<S>,
    config: ReelsConfig,
    events: UnboundedSender<RoundEvent>,
    state: Arc<Mutex<ReelsState>>,
}

impl<S: BalanceStore> ReelMachine<S> {
    pub fn new(
        ledger: TimeLedger<S>,
        config: ReelsConfig,
        rng: OutcomeRng,
        events: UnboundedSender<RoundEvent>,
    ) -> Self {
        Self {
            ledger,
            config,
            events,
            state: Arc::new(Mutex::new(ReelsState {
                phase: ReelsPhase::Idle,
                generation: 0,
                accumulated: 0,
                last_spin: None,
                rng,
            })),
        }
    }

    pub fn phase(&self) -> ReelsPhase {
        self.state.lock().unwrap().phase
    }

    /// Score accumulated across the session's spins so far.
    pub fn accumulated(&self) -> u64 {
        self.state.lock().unwrap().accumulated
    }

    /// Symbols and points of the most recent resolved spin.
    pub fn last_spin(&self) -> Option<([u8; 3], u64)> {
        self.state.lock().unwrap().last_spin
    }

    /// Spin the reels. The first spin of a session charges the session cost;
    /// spins from Resolved are free until [`ReelMachine::end`].
    pub fn spin(&self) -> Result<(), GameError> {
        let generation = {
            let mut state = self.state.lock().unwrap();
            match state.phase {
                ReelsPhase::Spinning => {
                    return Err(GameError::InvalidTransition {
                        action: "spin",
                        state: state.phase.as_str(),
                    });
                }
                ReelsPhase::Idle => {
                    // Session opens here; this is the only charged spin.
                    match self.ledger.debit(self.config.round_cost)? {
                        DebitOutcome::Accepted => {}
                        DebitOutcome::Rejected => return Err(GameError::InsufficientCredit),
                    }
                    state.accumulated = 0;
                }
                ReelsPhase::Resolved => {}
            }
            state.generation += 1;
            state.phase = ReelsPhase::Spinning;
            state.last_spin = None;
            state.generation
        };
        self.spawn_spin(generation);
        Ok(())
    }

    fn spawn_spin(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let spin = Duration::from_millis(self.config.spin_ms);
        let config = self.config;
        tokio::spawn(async move {
            time::sleep(spin).await;
            let mut state = state.lock().unwrap();
            if state.generation != generation || state.phase != ReelsPhase::Spinning {
                return; // session abandoned while the reels were turning
            }
            let draw = [
                state.rng.reel_symbol(config.symbols),
                state.rng.reel_symbol(config.symbols),
                state.rng.reel_symbol(config.symbols),
            ];
            let points = config.points(classify(draw));
            state.accumulated = state.accumulated.saturating_add(points);
            state.last_spin = Some((draw, points));
            state.phase = ReelsPhase::Resolved;
        });
    }

    /// Settle the session: emit the accumulated score and return to Idle.
    pub fn end(&self) -> Result<Settlement, GameError> {
        let mut state = self.state.lock().unwrap();
        match state.phase {
            ReelsPhase::Resolved => {
                let settlement = Settlement::new(state.accumulated, self.config.round_cost);
                let _ = self.events.send(RoundEvent::Settled {
                    game: GameKind::Reels,
                    settlement,
                });
                state.generation += 1;
                state.phase = ReelsPhase::Idle;
                state.accumulated = 0;
                state.last_spin = None;
                Ok(settlement)
            }
            phase => Err(GameError::InvalidTransition {
                action: "end",
                state: phase.as_str(),
            }),
        }
    }

    /// Abandon the session without a settlement.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        state.phase = ReelsPhase::Idle;
        state.accumulated = 0;
        state.last_spin = None;
    }
}
