use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::inventory::sync::{CycleReport, OfferSink, RowSource, SyncOrchestrator, TokenSource};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(7200);

/// Repeats sync cycles every `interval` until `cancel` fires.
///
/// The wait starts once a cycle has finished, so cycles never overlap.
/// Cancellation is honoured between cycles and while waiting, never in the
/// middle of a cycle. Each report is handed to `on_cycle` and then dropped.
/// Returns the number of cycles executed.
#[instrument(level = "info", skip_all, fields(interval_secs = interval.as_secs()))]
pub async fn run_periodic<T, R, S, F>(
    orchestrator: &SyncOrchestrator<T, R, S>,
    interval: Duration,
    cancel: &CancellationToken,
    mut on_cycle: F,
) -> usize
where
    T: TokenSource,
    R: RowSource,
    S: OfferSink,
    F: FnMut(&CycleReport),
{
    let mut cycles = 0;
    while !cancel.is_cancelled() {
        let report = orchestrator.run_cycle().await;
        cycles += 1;
        on_cycle(&report);

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    info!(cycles, "periodic sync stopped");
    cycles
}
