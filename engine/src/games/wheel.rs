//! WheelDraw: single-spin wheel with categorical bets.
//!
//! Round lifecycle: `Idle -> Spinning -> Resolved -> Idle`. The pocket is
//! drawn once, after the settling delay, and the outcome is final the moment
//! it is drawn; there is no cash-out race here. After a further display
//! delay the round settles and returns to Idle.
//!
//! Categories: Red, Black, Even, Odd, each paying 2x the bet amount. Pocket 0
//! is the house pocket and satisfies none of the four.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use playtime_types::{GameKind, Settlement, RED_POCKETS};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time;

use crate::games::registry::WheelConfig;
use crate::games::rng::OutcomeRng;
use crate::games::{GameError, RoundEvent};
use crate::ledger::{DebitOutcome, TimeLedger};
use crate::store::BalanceStore;

/// Bet categories for one spin. Exactly one category can match a drawn
/// pocket within each color/parity family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BetCategory {
    Red,
    Black,
    Even,
    Odd,
}

impl BetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetCategory::Red => "red",
            BetCategory::Black => "black",
            BetCategory::Even => "even",
            BetCategory::Odd => "odd",
        }
    }
}

/// A categorical bet on one spin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WheelBet {
    pub category: BetCategory,
    pub amount: u64,
}

/// Check if a pocket is red.
fn is_red(pocket: u8) -> bool {
    RED_POCKETS.contains(&pocket)
}

/// Whether a bet category matches the drawn pocket. Pocket 0 matches
/// nothing.
fn category_matches(category: BetCategory, pocket: u8) -> bool {
    if pocket == 0 {
        return false;
    }
    match category {
        BetCategory::Red => is_red(pocket),
        BetCategory::Black => !is_red(pocket),
        BetCategory::Even => pocket % 2 == 0,
        BetCategory::Odd => pocket % 2 == 1,
    }
}

/// Payout for a resolved spin: 2x the amount on a match, 0 otherwise.
pub fn resolve_payout(bet: &WheelBet, pocket: u8) -> u64 {
    if category_matches(bet.category, pocket) {
        bet.amount.saturating_mul(2)
    } else {
        0
    }
}

/// Observable round phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelPhase {
    Idle,
    Spinning,
    Resolved,
}

impl WheelPhase {
    fn as_str(&self) -> &'static str {
        match self {
            WheelPhase::Idle => "idle",
            WheelPhase::Spinning => "spinning",
            WheelPhase::Resolved => "resolved",
        }
    }
}

struct WheelState {
    phase: WheelPhase,
    generation: u64,
    bet: Option<WheelBet>,
    /// Drawn pocket and payout of the most recent resolved spin.
    last_result: Option<(u8, u64)>,
    rng: OutcomeRng,
}

pub struct WheelDraw<S> {
    ledger: TimeLedger<S>,
    config: WheelConfig,
    events: UnboundedSender<RoundEvent>,
    state: Arc<Mutex<WheelState>>,
}

impl<S: BalanceStore> WheelDraw<S> {
    pub fn new(
        ledger: TimeLedger<S>,
        config: WheelConfig,
        rng: OutcomeRng,
        events: UnboundedSender<RoundEvent>,
    ) -> Self {
        Self {
            ledger,
            config,
            events,
            state: Arc::new(Mutex::new(WheelState {
                phase: WheelPhase::Idle,
                generation: 0,
                bet: None,
                last_result: None,
                rng,
            })),
        }
    }

    pub fn phase(&self) -> WheelPhase {
        self.state.lock().unwrap().phase
    }

    /// Pocket and payout of the most recent resolved spin.
    pub fn last_result(&self) -> Option<(u8, u64)> {
        self.state.lock().unwrap().last_result
    }

    /// Charge the spin cost and start the wheel.
    pub fn spin(&self, bet: WheelBet) -> Result<(), GameError> {
        if bet.amount == 0 {
            return Err(GameError::InvalidBet);
        }
        let generation = {
            let mut state = self.state.lock().unwrap();
            if state.phase != WheelPhase::Idle {
                return Err(GameError::InvalidTransition {
                    action: "spin",
                    state: state.phase.as_str(),
                });
            }
            match self.ledger.debit(self.config.round_cost)? {
                DebitOutcome::Accepted => {}
                DebitOutcome::Rejected => return Err(GameError::InsufficientCredit),
            }
            state.generation += 1;
            state.phase = WheelPhase::Spinning;
            state.bet = Some(bet);
            state.last_result = None;
            state.generation
        };
        self.spawn_resolver(generation);
        Ok(())
    }

    fn spawn_resolver(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let settle = Duration::from_millis(self.config.settle_ms);
        let display = Duration::from_millis(self.config.display_ms);
        let pockets = self.config.pockets;
        let round_cost = self.config.round_cost;
        tokio::spawn(async move {
            time::sleep(settle).await;
            let payout = {
                let mut state = state.lock().unwrap();
                if state.generation != generation || state.phase != WheelPhase::Spinning {
                    return; // round abandoned while the wheel was settling
                }
                let pocket = state.rng.wheel_pocket(pockets);
                let bet = match state.bet {
                    Some(bet) => bet,
                    None => return,
                };
                let payout = resolve_payout(&bet, pocket);
                state.last_result = Some((pocket, payout));
                state.phase = WheelPhase::Resolved;
                payout
            };

            time::sleep(display).await;
            let mut state = state.lock().unwrap();
            if state.generation != generation || state.phase != WheelPhase::Resolved {
                return;
            }
            let _ = events.send(RoundEvent::Settled {
                game: GameKind::Wheel,
                settlement: Settlement::new(payout, round_cost),
            });
            state.phase = WheelPhase::Idle;
            state.bet = None;
        });
    }

    /// Return to Idle, discarding an unresolved spin without a settlement.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        state.phase = WheelPhase::Idle;
        state.bet = None;
    }
}
