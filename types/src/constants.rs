/// Minutes granted when an account record is first created.
pub const INITIAL_BALANCE: u64 = 120;

/// Hard cap on banked minutes (8 hours). Credits beyond the cap are discarded.
pub const MAX_BALANCE: u64 = 480;

/// Minutes granted per replenishment tick.
pub const REPLENISH_AMOUNT: u64 = 10;

/// Seconds between replenishment grants.
pub const REPLENISH_PERIOD_SECS: u64 = 60 * 60;

/// Minutes charged per Escalator round.
pub const ESCALATOR_ROUND_COST: u64 = 3;

/// Minutes charged per WheelDraw spin.
pub const WHEEL_ROUND_COST: u64 = 4;

/// Minutes charged per ReelMachine session.
pub const REELS_ROUND_COST: u64 = 5;

/// Fixed-point scale for game multipliers (10000 = 1.00x).
pub const MULTIPLIER_ONE_BPS: u64 = 10_000;

/// Escalator multiplier growth per tick, in basis points (0.01x).
pub const ESCALATOR_INCREMENT_BPS: u64 = 100;

/// Escalator tick period in milliseconds.
pub const ESCALATOR_TICK_MS: u64 = 100;

/// Crash threshold draw range in basis points: [1.00x, 11.00x).
pub const ESCALATOR_CRASH_MIN_BPS: u64 = 10_000;
pub const ESCALATOR_CRASH_MAX_BPS: u64 = 110_000;

/// Number of wheel pockets (0-36).
pub const WHEEL_POCKETS: u8 = 37;

/// Red pockets on the wheel. Pocket 0 is the house pocket and belongs to no
/// category; everything else that is not red is black.
pub const RED_POCKETS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Wheel settling delay before the pocket is drawn, in milliseconds.
pub const WHEEL_SETTLE_MS: u64 = 3_000;

/// Result display delay before settlement, in milliseconds.
pub const WHEEL_DISPLAY_MS: u64 = 2_000;

/// Reel spin duration in milliseconds.
pub const REELS_SPIN_MS: u64 = 2_000;

/// Reel symbol alphabet. Spins draw indices into this table.
pub const REEL_SYMBOLS: [&str; 8] = [
    "apple", "orange", "lemon", "grape", "cherry", "bell", "diamond", "star",
];

/// Points for three matching symbols.
pub const TIER_JACKPOT: u64 = 1_000;

/// Points for exactly two matching symbols.
pub const TIER_PAIR: u64 = 100;

/// Points for a spin with no matching symbols.
pub const TIER_PARTICIPATION: u64 = 10;
