//! Game registry: per-game configuration and catalog metadata.
//!
//! The registry provides a centralized listing of the supported games, each
//! with a configuration carrying its tunables (round cost, timer periods,
//! payout tables). All configurations implement `Default` with the platform
//! constants.

use std::collections::HashMap;

use playtime_types::{
    GameKind, ESCALATOR_CRASH_MAX_BPS, ESCALATOR_CRASH_MIN_BPS, ESCALATOR_INCREMENT_BPS,
    ESCALATOR_ROUND_COST, ESCALATOR_TICK_MS, REELS_ROUND_COST, REELS_SPIN_MS, REEL_SYMBOLS,
    TIER_JACKPOT, TIER_PAIR, TIER_PARTICIPATION, WHEEL_DISPLAY_MS, WHEEL_POCKETS,
    WHEEL_ROUND_COST, WHEEL_SETTLE_MS,
};

/// Escalator configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscalatorConfig {
    /// Minutes charged per round.
    pub round_cost: u64,
    /// Tick period in milliseconds.
    pub tick_ms: u64,
    /// Multiplier growth per tick, in basis points.
    pub increment_bps: u64,
    /// Crash threshold draw range, `[min, max)` in basis points.
    pub crash_min_bps: u64,
    pub crash_max_bps: u64,
}

impl Default for EscalatorConfig {
    fn default() -> Self {
        Self {
            round_cost: ESCALATOR_ROUND_COST,
            tick_ms: ESCALATOR_TICK_MS,
            increment_bps: ESCALATOR_INCREMENT_BPS,
            crash_min_bps: ESCALATOR_CRASH_MIN_BPS,
            crash_max_bps: ESCALATOR_CRASH_MAX_BPS,
        }
    }
}

impl EscalatorConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.round_cost == 0 {
            return Err("round_cost must be greater than zero");
        }
        if self.tick_ms == 0 {
            return Err("tick_ms must be greater than zero");
        }
        if self.increment_bps == 0 {
            return Err("increment_bps must be greater than zero");
        }
        if self.crash_min_bps > self.crash_max_bps {
            return Err("crash_min_bps must not exceed crash_max_bps");
        }
        Ok(())
    }
}

/// WheelDraw configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WheelConfig {
    /// Minutes charged per spin.
    pub round_cost: u64,
    /// Number of pockets on the wheel.
    pub pockets: u8,
    /// Settling delay before the pocket is drawn, in milliseconds.
    pub settle_ms: u64,
    /// Result display delay before settlement, in milliseconds.
    pub display_ms: u64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            round_cost: WHEEL_ROUND_COST,
            pockets: WHEEL_POCKETS,
            settle_ms: WHEEL_SETTLE_MS,
            display_ms: WHEEL_DISPLAY_MS,
        }
    }
}

impl WheelConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.round_cost == 0 {
            return Err("round_cost must be greater than zero");
        }
        if self.pockets == 0 {
            return Err("pockets must be greater than zero");
        }
        Ok(())
    }
}

/// ReelMachine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReelsConfig {
    /// Minutes charged per session (first spin only).
    pub round_cost: u64,
    /// Size of the symbol alphabet.
    pub symbols: u8,
    /// Spin duration in milliseconds.
    pub spin_ms: u64,
    /// Points for three matching symbols.
    pub jackpot_points: u64,
    /// Points for exactly two matching symbols.
    pub pair_points: u64,
    /// Points for a spin with no matching symbols.
    pub participation_points: u64,
}

impl Default for ReelsConfig {
    fn default() -> Self {
        Self {
            round_cost: REELS_ROUND_COST,
            symbols: REEL_SYMBOLS.len() as u8,
            spin_ms: REELS_SPIN_MS,
            jackpot_points: TIER_JACKPOT,
            pair_points: TIER_PAIR,
            participation_points: TIER_PARTICIPATION,
        }
    }
}

impl ReelsConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.round_cost == 0 {
            return Err("round_cost must be greater than zero");
        }
        if self.symbols < 2 {
            return Err("symbols must allow distinct draws");
        }
        Ok(())
    }
}

/// Per-game configuration values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameConfig {
    Escalator(EscalatorConfig),
    Wheel(WheelConfig),
    Reels(ReelsConfig),
}

impl GameConfig {
    /// Create a default configuration for a game kind.
    pub fn default_for(kind: GameKind) -> Self {
        match kind {
            GameKind::Escalator => Self::Escalator(EscalatorConfig::default()),
            GameKind::Wheel => Self::Wheel(WheelConfig::default()),
            GameKind::Reels => Self::Reels(ReelsConfig::default()),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Self::Escalator(_) => GameKind::Escalator,
            Self::Wheel(_) => GameKind::Wheel,
            Self::Reels(_) => GameKind::Reels,
        }
    }

    pub fn round_cost(&self) -> u64 {
        match self {
            Self::Escalator(c) => c.round_cost,
            Self::Wheel(c) => c.round_cost,
            Self::Reels(c) => c.round_cost,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            Self::Escalator(c) => c.validate(),
            Self::Wheel(c) => c.validate(),
            Self::Reels(c) => c.validate(),
        }
    }
}

/// Metadata for catalog display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameInfo {
    pub kind: GameKind,
    pub name: &'static str,
    pub description: &'static str,
    pub round_cost: u64,
}

/// Catalog of supported games and their configurations.
#[derive(Clone, Debug)]
pub struct GameRegistry {
    configs: HashMap<GameKind, GameConfig>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        let configs = GameKind::all()
            .into_iter()
            .map(|kind| (kind, GameConfig::default_for(kind)))
            .collect();
        Self { configs }
    }
}

impl GameRegistry {
    pub fn config(&self, kind: GameKind) -> Option<&GameConfig> {
        self.configs.get(&kind)
    }

    /// Replace one game's configuration.
    pub fn set_config(&mut self, config: GameConfig) {
        self.configs.insert(config.kind(), config);
    }

    pub fn info(&self, kind: GameKind) -> Option<GameInfo> {
        let config = self.configs.get(&kind)?;
        let (name, description) = match kind {
            GameKind::Escalator => (
                "Escalator",
                "Ride the multiplier and cash out before the crash.",
            ),
            GameKind::Wheel => ("Wheel", "One spin, one pocket, categorical bets."),
            GameKind::Reels => ("Reels", "Three reels, tiered payouts, spin all session."),
        };
        Some(GameInfo {
            kind,
            name,
            description,
            round_cost: config.round_cost(),
        })
    }

    pub fn games(&self) -> Vec<GameInfo> {
        GameKind::all()
            .into_iter()
            .filter_map(|kind| self.info(kind))
            .collect()
    }
}
