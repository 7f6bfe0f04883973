//! One sync cycle: token, read, map, submit.

use std::fmt;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

use crate::inventory::error::{Result, SyncError};
use crate::inventory::mapper::{self, OfferDefaults};
use crate::inventory::model::{AccessToken, OfferPayload, ReadMode, Row, SubmissionReport};

/// Exchanges a static credential for a per-cycle access token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn acquire_token(&self, credential: &str) -> Result<AccessToken>;
}

/// Delivers an offer payload to the remote API.
#[async_trait]
pub trait OfferSink: Send + Sync {
    async fn submit(&self, payload: &OfferPayload, token: &AccessToken) -> Result<SubmissionReport>;
}

/// Produces the typed rows for one cycle.
pub trait RowSource: Send + Sync {
    fn read_rows(&self, mode: ReadMode) -> Result<Vec<Row>>;
}

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Token,
    Read,
    Submit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Token => write!(f, "token"),
            Stage::Read => write!(f, "read"),
            Stage::Submit => write!(f, "submit"),
        }
    }
}

/// Progress of a cycle, traced on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleState {
    TokenPending,
    TokenAcquired,
    ReadPending,
    DataReady,
    SubmitPending,
    SubmitDone,
}

/// How a cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The import request got an answer, whatever its status.
    Submitted { offers: usize, status: u16 },
    /// A stage failed; later stages were not run.
    Failed { stage: Stage, error: SyncError },
}

impl CycleOutcome {
    /// Whether the pipeline got as far as attempting the submission.
    pub fn reached_submission(&self) -> bool {
        matches!(
            self,
            CycleOutcome::Submitted { .. }
                | CycleOutcome::Failed {
                    stage: Stage::Submit,
                    ..
                }
        )
    }

    /// Process exit code for a single-shot run: 0 once a submission was
    /// attempted, whatever the remote answered; 1 on token or read failure.
    pub fn exit_code(&self) -> i32 {
        if self.reached_submission() { 0 } else { 1 }
    }
}

/// Result of one cycle together with the instant it started.
#[derive(Debug)]
pub struct CycleReport {
    pub started_at: Instant,
    pub outcome: CycleOutcome,
}

/// Sequences token exchange, spreadsheet read, mapping and submission.
#[derive(Debug)]
pub struct SyncOrchestrator<T, R, S> {
    tokens: T,
    rows: R,
    sink: S,
    credential: String,
    mode: ReadMode,
    defaults: OfferDefaults,
}

impl<T, R, S> SyncOrchestrator<T, R, S>
where
    T: TokenSource,
    R: RowSource,
    S: OfferSink,
{
    pub fn new(
        tokens: T,
        rows: R,
        sink: S,
        credential: impl Into<String>,
        mode: ReadMode,
        defaults: OfferDefaults,
    ) -> Self {
        Self {
            tokens,
            rows,
            sink,
            credential: credential.into(),
            mode,
            defaults,
        }
    }

    /// Runs one cycle. Stage failures are logged and folded into the report.
    #[instrument(level = "info", skip_all, fields(mode = %self.mode))]
    pub async fn run_cycle(&self) -> CycleReport {
        let started_at = Instant::now();
        let outcome = match self.execute().await {
            Ok((offers, report)) => {
                info!(offers, status = report.status, "sync cycle finished");
                CycleOutcome::Submitted {
                    offers,
                    status: report.status,
                }
            }
            Err((stage, error)) => {
                error!(%stage, kind = %error.kind(), error = %error, "sync cycle aborted");
                CycleOutcome::Failed { stage, error }
            }
        };
        CycleReport {
            started_at,
            outcome,
        }
    }

    async fn execute(&self) -> std::result::Result<(usize, SubmissionReport), (Stage, SyncError)> {
        transition(CycleState::TokenPending);
        let token = self
            .tokens
            .acquire_token(&self.credential)
            .await
            .map_err(|error| (Stage::Token, error))?;
        transition(CycleState::TokenAcquired);

        transition(CycleState::ReadPending);
        let payload = self
            .rows
            .read_rows(self.mode)
            .and_then(|rows| mapper::build_payload(&rows, self.mode, &self.defaults))
            .map_err(|error| (Stage::Read, error))?;
        transition(CycleState::DataReady);

        transition(CycleState::SubmitPending);
        let report = self
            .sink
            .submit(&payload, &token)
            .await
            .map_err(|error| (Stage::Submit, error))?;
        transition(CycleState::SubmitDone);

        Ok((payload.len(), report))
    }
}

fn transition(state: CycleState) {
    debug!(?state, "cycle state");
}
