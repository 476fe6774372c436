use serde::{Deserialize, Serialize};

/// Final outcome record of one completed game round.
///
/// Emitted exactly once per round and immutable after creation. A crashed
/// round settles with `score: 0`; the minutes are consumed either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub score: u64,
    pub minutes_consumed: u64,
}

impl Settlement {
    pub fn new(score: u64, minutes_consumed: u64) -> Self {
        Self {
            score,
            minutes_consumed,
        }
    }
}
