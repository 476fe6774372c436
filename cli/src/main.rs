//! Demo driver: one user session played end-to-end against the in-memory
//! store. The real platform wires the same engine to a durable store and a
//! score service; this binary stands in for that page-level glue, draining
//! settlement events into the recorder and printing them as JSON lines.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use playtime_engine::mocks::{MemoryRecorder, MemoryStore};
use playtime_engine::{
    BetCategory, Escalator, EscalatorConfig, GameError, GameRegistry, LedgerConfig, OutcomeRng,
    PlayerSession, ReelMachine, ReelsConfig, RoundEvent, ScoreRecorder, WheelBet, WheelConfig,
    WheelDraw,
};
use playtime_types::{Settlement, UserId, REEL_SYMBOLS};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{sleep, Duration};

#[derive(Parser, Debug)]
#[command(name = "playtime", about = "Play a demo session on borrowed minutes")]
struct Args {
    /// User identity for the session.
    #[arg(long, default_value = "demo")]
    user: String,
    /// Escalator stake.
    #[arg(long, default_value_t = 25)]
    stake: u64,
    /// Wheel bet amount.
    #[arg(long, default_value_t = 10)]
    bet: u64,
    /// Reel spins to play in one session.
    #[arg(long, default_value_t = 3)]
    spins: u32,
    /// RNG seed for reproducible rounds.
    #[arg(long)]
    seed: Option<u64>,
}

fn rng(seed: Option<u64>, salt: u64) -> OutcomeRng {
    match seed {
        Some(seed) => OutcomeRng::seeded(seed.wrapping_add(salt)),
        None => OutcomeRng::from_entropy(),
    }
}

async fn record_settled(
    events: &mut UnboundedReceiver<RoundEvent>,
    recorder: &MemoryRecorder,
    user: &UserId,
) -> Option<Settlement> {
    let RoundEvent::Settled { game, settlement } = events.recv().await?;
    if let Err(err) = recorder.record(game, user, settlement).await {
        tracing::warn!("score recording failed: {err}");
    }
    println!(
        "{}",
        serde_json::json!({
            "game": game.as_str(),
            "score": settlement.score,
            "minutes_consumed": settlement.minutes_consumed,
        })
    );
    Some(settlement)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let store = Arc::new(MemoryStore::new());
    let recorder = MemoryRecorder::new();
    let session = PlayerSession::activate(
        UserId::new(args.user.clone()),
        Arc::clone(&store),
        LedgerConfig::default(),
    )
    .await?;
    let ledger = session.ledger().clone();
    let user = ledger.user().clone();

    for info in GameRegistry::default().games() {
        println!("{:<10} {:>2} min  {}", info.name, info.round_cost, info.description);
    }
    println!("balance: {} minutes", ledger.balance());

    let (events_tx, mut events) = mpsc::unbounded_channel();

    // Escalator: ride to ~1.5x, cash out unless the crash wins first.
    let escalator = Escalator::new(
        ledger.clone(),
        EscalatorConfig::default(),
        rng(args.seed, 1),
        events_tx.clone(),
    );
    escalator.start(args.stake)?;
    sleep(Duration::from_millis(50 * 100)).await;
    match escalator.cash_out() {
        Ok(settlement) => tracing::info!(score = settlement.score, "cashed out"),
        Err(GameError::CrashPreempted) => tracing::info!("crashed before the cash-out"),
        Err(err) => return Err(err.into()),
    }
    record_settled(&mut events, &recorder, &user).await;
    escalator.reset();

    // Wheel: one spin with demo-compressed timings.
    let wheel = WheelDraw::new(
        ledger.clone(),
        WheelConfig {
            settle_ms: 300,
            display_ms: 200,
            ..WheelConfig::default()
        },
        rng(args.seed, 2),
        events_tx.clone(),
    );
    wheel.spin(WheelBet {
        category: BetCategory::Even,
        amount: args.bet,
    })?;
    record_settled(&mut events, &recorder, &user).await;

    // Reels: one charged session of free spins.
    let reels = ReelMachine::new(
        ledger.clone(),
        ReelsConfig {
            spin_ms: 200,
            ..ReelsConfig::default()
        },
        rng(args.seed, 3),
        events_tx,
    );
    for _ in 0..args.spins {
        reels.spin()?;
        sleep(Duration::from_millis(250)).await;
        if let Some((symbols, points)) = reels.last_spin() {
            let names: Vec<&str> = symbols
                .iter()
                .map(|&s| REEL_SYMBOLS[s as usize])
                .collect();
            tracing::info!(?names, points, "reels stopped");
        }
    }
    reels.end()?;
    record_settled(&mut events, &recorder, &user).await;

    println!("balance: {} minutes", ledger.balance());
    println!("recorded rounds: {}", recorder.recorded().len());
    session.deactivate();
    Ok(())
}
