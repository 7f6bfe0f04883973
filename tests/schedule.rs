use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use inventory_sync::mapper::OfferDefaults;
use inventory_sync::model::{AccessToken, OfferPayload, ReadMode, Row, SubmissionReport};
use inventory_sync::schedule::run_periodic;
use inventory_sync::sync::{
    CycleOutcome, OfferSink, RowSource, Stage, SyncOrchestrator, TokenSource,
};
use inventory_sync::{Result, SyncError};
use rust_decimal::Decimal;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

struct StaticToken;

#[async_trait]
impl TokenSource for StaticToken {
    async fn acquire_token(&self, _credential: &str) -> Result<AccessToken> {
        Ok(AccessToken::new("tok_abc123"))
    }
}

struct OneRow;

impl RowSource for OneRow {
    fn read_rows(&self, _mode: ReadMode) -> Result<Vec<Row>> {
        Ok(vec![Row {
            available_stock: 1,
            total_stock: 2,
            unit_price: Decimal::new(15, 1),
            internal_part_number: "PN-1".into(),
        }])
    }
}

struct MissingFile;

impl RowSource for MissingFile {
    fn read_rows(&self, _mode: ReadMode) -> Result<Vec<Row>> {
        Err(SyncError::NotFound(PathBuf::from("Availability.xlsx")))
    }
}

/// Fails the first submission, accepts the rest.
#[derive(Default)]
struct FlakySink {
    calls: AtomicUsize,
}

#[async_trait]
impl OfferSink for FlakySink {
    async fn submit(&self, _payload: &OfferPayload, _token: &AccessToken) -> Result<SubmissionReport> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(SyncError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(SubmissionReport { status: 200 })
    }
}

fn orchestrator<R: RowSource>(rows: R) -> SyncOrchestrator<StaticToken, R, FlakySink> {
    SyncOrchestrator::new(
        StaticToken,
        rows,
        FlakySink::default(),
        "secret",
        ReadMode::Batch,
        OfferDefaults::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn second_cycle_runs_after_failed_submission() {
    let sync = orchestrator(OneRow);
    let cancel = CancellationToken::new();
    let interval = Duration::from_secs(1);
    let mut seen: Vec<(Instant, bool)> = Vec::new();

    let cycles = run_periodic(&sync, interval, &cancel, |report| {
        let submitted = matches!(report.outcome, CycleOutcome::Submitted { .. });
        if let CycleOutcome::Failed { stage, .. } = &report.outcome {
            assert_eq!(*stage, Stage::Submit);
        }
        seen.push((report.started_at, submitted));
        if seen.len() == 2 {
            cancel.cancel();
        }
    })
    .await;

    assert_eq!(cycles, 2);
    assert!(!seen[0].1);
    assert!(seen[1].1);
    assert!(seen[1].0 - seen[0].0 >= interval);
}

#[tokio::test(start_paused = true)]
async fn read_failures_do_not_stop_the_loop() {
    let sync = orchestrator(MissingFile);
    let cancel = CancellationToken::new();
    let mut failures = 0;

    let cycles = run_periodic(&sync, Duration::from_secs(7200), &cancel, |report| {
        if matches!(
            report.outcome,
            CycleOutcome::Failed {
                stage: Stage::Read,
                ..
            }
        ) {
            failures += 1;
        }
        if failures == 3 {
            cancel.cancel();
        }
    })
    .await;

    assert_eq!(cycles, 3);
    assert_eq!(failures, 3);
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_the_wait() {
    let sync = orchestrator(OneRow);
    let cancel = CancellationToken::new();
    let interval = Duration::from_secs(7200);
    let started = Instant::now();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        trigger.cancel();
    });

    let cycles = run_periodic(&sync, interval, &cancel, |_| {}).await;

    assert_eq!(cycles, 1);
    assert!(started.elapsed() < interval);
}

#[tokio::test]
async fn cancelled_token_runs_no_cycle() {
    let sync = orchestrator(OneRow);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let cycles = run_periodic(&sync, Duration::from_secs(1), &cancel, |_| {}).await;

    assert_eq!(cycles, 0);
}
