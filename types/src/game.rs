use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::{ESCALATOR_ROUND_COST, REELS_ROUND_COST, WHEEL_ROUND_COST};

#[derive(Debug, ThisError, PartialEq, Eq)]
#[error("unknown game kind: {0}")]
pub struct UnknownGameKind(pub u8);

/// The three chance games offered by the platform.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    /// Continuously-escalating multiplier with a race to cash out.
    Escalator = 0,
    /// Single-draw wheel with categorical bets.
    Wheel = 1,
    /// Multi-reel randomized symbols with tiered payouts.
    Reels = 2,
}

impl GameKind {
    pub fn all() -> [GameKind; 3] {
        [GameKind::Escalator, GameKind::Wheel, GameKind::Reels]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Escalator => "escalator",
            GameKind::Wheel => "wheel",
            GameKind::Reels => "reels",
        }
    }

    /// Default minutes charged for one round of this game. The engine's
    /// registry carries the configurable value; this is its baseline.
    pub fn default_round_cost(&self) -> u64 {
        match self {
            GameKind::Escalator => ESCALATOR_ROUND_COST,
            GameKind::Wheel => WHEEL_ROUND_COST,
            GameKind::Reels => REELS_ROUND_COST,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for GameKind {
    type Error = UnknownGameKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GameKind::Escalator),
            1 => Ok(GameKind::Wheel),
            2 => Ok(GameKind::Reels),
            other => Err(UnknownGameKind(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_u8() {
        for kind in GameKind::all() {
            assert_eq!(GameKind::try_from(kind as u8), Ok(kind));
        }
        assert_eq!(GameKind::try_from(3), Err(UnknownGameKind(3)));
    }

    #[test]
    fn default_round_costs() {
        assert_eq!(GameKind::Escalator.default_round_cost(), 3);
        assert_eq!(GameKind::Wheel.default_round_cost(), 4);
        assert_eq!(GameKind::Reels.default_round_cost(), 5);
    }
}
