//! Escalator: continuously-escalating multiplier with a race to cash out.
//!
//! Round lifecycle: `Idle -> Armed -> Running -> {Crashed | CashedOut} -> Idle`.
//! The multiplier is fixed-point basis points (10000 = 1.00x) and grows by a
//! fixed increment per tick; the crash threshold is drawn uniformly when the
//! round is armed. The tick task and `cash_out` contend on one mutex, so the
//! terminal transition out of Running happens exactly once per round. Crash
//! wins ties: a cash-out arriving at or after the multiplier crossed the
//! threshold is rejected.
//!
//! Ticks are keyed by a round generation checked under the lock before any
//! effect applies. Abandoning a round (`reset`) bumps the generation, so a
//! tick already in flight sees a stale key and dies without effect.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use playtime_types::{GameKind, Settlement, MULTIPLIER_ONE_BPS};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time;

use crate::games::registry::EscalatorConfig;
use crate::games::rng::OutcomeRng;
use crate::games::{GameError, RoundEvent};
use crate::ledger::{DebitOutcome, TimeLedger};
use crate::store::BalanceStore;

/// Observable round phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscalatorPhase {
    Idle,
    /// Charged and threshold drawn; the tick loop is not live yet.
    Armed,
    Running,
    Crashed,
    CashedOut,
}

impl EscalatorPhase {
    fn as_str(&self) -> &'static str {
        match self {
            EscalatorPhase::Idle => "idle",
            EscalatorPhase::Armed => "armed",
            EscalatorPhase::Running => "running",
            EscalatorPhase::Crashed => "crashed",
            EscalatorPhase::CashedOut => "cashed_out",
        }
    }
}

struct EscalatorState {
    phase: EscalatorPhase,
    generation: u64,
    stake: u64,
    multiplier_bps: u64,
    crash_bps: u64,
    rng: OutcomeRng,
}

pub struct Escalator<S> {
    ledger: TimeLedger<S>,
    config: EscalatorConfig,
    events: UnboundedSender<RoundEvent>,
    state: Arc<Mutex<EscalatorState>>,
}

impl<S: BalanceStore> Escalator<S> {
    pub fn new(
        ledger: TimeLedger<S>,
        config: EscalatorConfig,
        rng: OutcomeRng,
        events: UnboundedSender<RoundEvent>,
    ) -> Self {
        Self {
            ledger,
            config,
            events,
            state: Arc::new(Mutex::new(EscalatorState {
                phase: EscalatorPhase::Idle,
                generation: 0,
                stake: 0,
                multiplier_bps: MULTIPLIER_ONE_BPS,
                crash_bps: 0,
                rng,
            })),
        }
    }

    pub fn phase(&self) -> EscalatorPhase {
        self.state.lock().unwrap().phase
    }

    /// Current multiplier in basis points.
    pub fn multiplier_bps(&self) -> u64 {
        self.state.lock().unwrap().multiplier_bps
    }

    /// Charge the round cost and arm a new round.
    ///
    /// Insufficient credit is surfaced here, before any timer starts; the
    /// simulator stays Idle and the balance is untouched.
    pub fn start(&self, stake: u64) -> Result<(), GameError> {
        if stake == 0 {
            return Err(GameError::InvalidBet);
        }
        let generation = {
            let mut state = self.state.lock().unwrap();
            if state.phase != EscalatorPhase::Idle {
                return Err(GameError::InvalidTransition {
                    action: "start",
                    state: state.phase.as_str(),
                });
            }
            match self.ledger.debit(self.config.round_cost)? {
                DebitOutcome::Accepted => {}
                DebitOutcome::Rejected => return Err(GameError::InsufficientCredit),
            }
            state.generation += 1;
            state.stake = stake;
            state.multiplier_bps = MULTIPLIER_ONE_BPS;
            state.crash_bps = state
                .rng
                .crash_threshold_bps(self.config.crash_min_bps, self.config.crash_max_bps);
            state.phase = EscalatorPhase::Armed;
            state.generation
        };
        self.spawn_ticker(generation);
        Ok(())
    }

    fn spawn_ticker(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let tick = Duration::from_millis(self.config.tick_ms);
        let increment = self.config.increment_bps;
        let round_cost = self.config.round_cost;
        tokio::spawn(async move {
            {
                let mut state = state.lock().unwrap();
                if state.generation != generation || state.phase != EscalatorPhase::Armed {
                    return;
                }
                state.phase = EscalatorPhase::Running;
            }
            let mut interval = time::interval_at(time::Instant::now() + tick, tick);
            loop {
                interval.tick().await;
                let mut state = state.lock().unwrap();
                // Liveness check: the round may have been cashed out or
                // abandoned while this tick was in flight.
                if state.generation != generation || state.phase != EscalatorPhase::Running {
                    return;
                }
                state.multiplier_bps += increment;
                if state.multiplier_bps >= state.crash_bps {
                    state.phase = EscalatorPhase::Crashed;
                    let _ = events.send(RoundEvent::Settled {
                        game: GameKind::Escalator,
                        settlement: Settlement::new(0, round_cost),
                    });
                    return;
                }
            }
        });
    }

    /// Race the crash: settle the round at the current multiplier.
    pub fn cash_out(&self) -> Result<Settlement, GameError> {
        let mut state = self.state.lock().unwrap();
        match state.phase {
            EscalatorPhase::Running => {
                if state.multiplier_bps >= state.crash_bps {
                    // The crossing happened before this call; crash wins ties.
                    return Err(GameError::CrashPreempted);
                }
                state.phase = EscalatorPhase::CashedOut;
                let score = state.stake.saturating_mul(state.multiplier_bps) / MULTIPLIER_ONE_BPS;
                let settlement = Settlement::new(score, self.config.round_cost);
                let _ = self.events.send(RoundEvent::Settled {
                    game: GameKind::Escalator,
                    settlement,
                });
                Ok(settlement)
            }
            EscalatorPhase::Crashed => Err(GameError::CrashPreempted),
            phase => Err(GameError::InvalidTransition {
                action: "cash_out",
                state: phase.as_str(),
            }),
        }
    }

    /// Return to Idle. Abandoning a Running round stops the tick loop and
    /// discards the round without a settlement.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        state.phase = EscalatorPhase::Idle;
        state.stake = 0;
        state.multiplier_bps = MULTIPLIER_ONE_BPS;
        state.crash_bps = 0;
    }
}
