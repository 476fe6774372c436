//! End-to-end scenarios across the ledger, scheduler and simulators.

use std::sync::Arc;
use std::time::Duration;

use playtime_types::{GameKind, UserId, INITIAL_BALANCE, REPLENISH_PERIOD_SECS};
use tokio::sync::mpsc;

use crate::games::escalator::{Escalator, EscalatorPhase};
use crate::games::registry::{EscalatorConfig, ReelsConfig, WheelConfig};
use crate::games::reels::ReelMachine;
use crate::games::rng::OutcomeRng;
use crate::games::wheel::{BetCategory, WheelBet, WheelDraw};
use crate::games::RoundEvent;
use crate::ledger::LedgerConfig;
use crate::mocks::{MemoryRecorder, MemoryStore};
use crate::recorder::ScoreRecorder;
use crate::session::PlayerSession;

async fn advance(ms: u64) {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    tokio::time::advance(Duration::from_millis(ms)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn a_full_visit_settles_three_games_and_records_scores() {
    let store = Arc::new(MemoryStore::new());
    let session = PlayerSession::activate(
        UserId::new("dana"),
        Arc::clone(&store),
        LedgerConfig::default(),
    )
    .await
    .unwrap();
    let ledger = session.ledger().clone();
    let recorder = MemoryRecorder::new();
    let (events_tx, mut events) = mpsc::unbounded_channel();

    // One escalator round, cashed out at 1.10x.
    let escalator = Escalator::new(
        ledger.clone(),
        EscalatorConfig {
            crash_min_bps: 20_000,
            crash_max_bps: 20_000,
            ..EscalatorConfig::default()
        },
        OutcomeRng::seeded(1),
        events_tx.clone(),
    );
    escalator.start(50).unwrap();
    for _ in 0..10 {
        advance(100).await;
    }
    let cashed = escalator.cash_out().unwrap();
    assert_eq!(cashed.score, 55);
    assert_eq!(escalator.phase(), EscalatorPhase::CashedOut);
    escalator.reset();

    // One wheel spin, run to settlement.
    let wheel = WheelDraw::new(
        ledger.clone(),
        WheelConfig::default(),
        OutcomeRng::seeded(2),
        events_tx.clone(),
    );
    wheel
        .spin(WheelBet {
            category: BetCategory::Even,
            amount: 10,
        })
        .unwrap();
    advance(3_000).await;
    advance(2_000).await;

    // One reel session of two spins.
    let reels = ReelMachine::new(
        ledger.clone(),
        ReelsConfig::default(),
        OutcomeRng::seeded(3),
        events_tx,
    );
    reels.spin().unwrap();
    advance(2_000).await;
    reels.spin().unwrap();
    advance(2_000).await;
    let total = reels.accumulated();
    assert!(total >= 20); // two spins, participation at minimum
    let reel_settlement = reels.end().unwrap();
    assert_eq!(reel_settlement.score, total);

    // Page-level glue: drain the settlement events into the recorder.
    let mut seen = Vec::new();
    while let Ok(RoundEvent::Settled { game, settlement }) = events.try_recv() {
        recorder
            .record(game, ledger.user(), settlement)
            .await
            .unwrap();
        seen.push((game, settlement));
    }
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].0, GameKind::Escalator);
    assert_eq!(seen[1].0, GameKind::Wheel);
    assert_eq!(seen[2].0, GameKind::Reels);
    assert_eq!(recorder.recorded().len(), 3);

    // Minutes consumed: 3 + 4 + 5 across the visit.
    assert_eq!(ledger.balance(), INITIAL_BALANCE - 12);

    // Replenishment keeps running regardless of game activity.
    advance(REPLENISH_PERIOD_SECS * 1_000).await;
    assert_eq!(ledger.balance(), INITIAL_BALANCE - 12 + 10);

    session.deactivate();
}

#[tokio::test(start_paused = true)]
async fn persistence_failure_never_aborts_a_running_round() {
    let store = Arc::new(MemoryStore::new());
    let session = PlayerSession::activate(
        UserId::new("erin"),
        Arc::clone(&store),
        LedgerConfig::default(),
    )
    .await
    .unwrap();
    let ledger = session.ledger().clone();

    // The store goes dark after activation; the round must still play out.
    store.fail_writes(true);

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let escalator = Escalator::new(
        ledger.clone(),
        EscalatorConfig {
            crash_min_bps: 20_000,
            crash_max_bps: 20_000,
            ..EscalatorConfig::default()
        },
        OutcomeRng::seeded(4),
        events_tx,
    );
    escalator.start(10).unwrap();

    // The optimistic debit was reverted once the write failed...
    advance(100).await;
    assert_eq!(ledger.balance(), INITIAL_BALANCE);

    // ...but the round keeps running and settles normally.
    for _ in 0..4 {
        advance(100).await;
    }
    let settlement = escalator.cash_out().unwrap();
    assert_eq!(settlement.minutes_consumed, 3);
    assert!(events.try_recv().is_ok());

    session.deactivate();
}

#[tokio::test(start_paused = true)]
async fn concurrent_initialization_converges_on_one_record() {
    let store = Arc::new(MemoryStore::new());
    let first = PlayerSession::activate(
        UserId::new("frank"),
        Arc::clone(&store),
        LedgerConfig::default(),
    )
    .await
    .unwrap();
    first.ledger().debit(30).unwrap();
    advance(1).await;

    // A second association with the same identity observes the surviving
    // record instead of re-initializing it.
    let second = PlayerSession::activate(
        UserId::new("frank"),
        Arc::clone(&store),
        LedgerConfig::default(),
    )
    .await
    .unwrap();
    assert_eq!(second.ledger().balance(), INITIAL_BALANCE - 30);

    first.deactivate();
    second.deactivate();
}
