//! Score-recording collaborator.

use std::future::Future;

use playtime_types::{GameKind, Settlement, UserId};

use crate::store::StoreError;

/// Records one settlement per completed round.
///
/// Called by page-level glue after a round settles, never by a simulator.
/// Failure is logged by the caller and is non-fatal to gameplay.
pub trait ScoreRecorder: Send + Sync + 'static {
    fn record(
        &self,
        game: GameKind,
        user: &UserId,
        settlement: Settlement,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
