use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use inventory_sync::api::ApiClient;
use inventory_sync::config::{Overrides, Settings, SyncConfig};
use inventory_sync::io::WorkbookSource;
use inventory_sync::logging::{self, LogFormat};
use inventory_sync::model::ReadMode;
use inventory_sync::sync::SyncOrchestrator;
use inventory_sync::{Result, schedule, shutdown};
use tokio_util::sync::CancellationToken;

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    logging::init(cli.log_format.into(), cli.log_filter.as_deref())?;
    match cli.command {
        Command::Sync(args) => execute_sync(args),
    }
}

fn execute_sync(args: SyncArgs) -> Result<i32> {
    let config = Settings::load(args.config.as_deref())?
        .apply(args.overrides())
        .validate()?;
    tracing::debug!(?config, "configuration resolved");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(sync_inventory(config))
}

async fn sync_inventory(config: SyncConfig) -> Result<i32> {
    let client = ApiClient::new(config.base_url.as_str(), config.timeout)?;
    let source = WorkbookSource::new(config.input.clone(), config.sheet.clone());
    let orchestrator = SyncOrchestrator::new(
        client.clone(),
        source,
        client,
        config.credential.as_str(),
        config.mode,
        config.offer.clone(),
    );

    if !config.periodic {
        let report = orchestrator.run_cycle().await;
        return Ok(report.outcome.exit_code());
    }

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown::cancel_on_signal(cancel.clone()));
    schedule::run_periodic(&orchestrator, config.interval, &cancel, |_| {}).await;
    Ok(0)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Publish spreadsheet inventory to an offer import API."
)]
struct Cli {
    /// Log filter directive used when RUST_LOG is unset.
    #[arg(long, global = true)]
    log_filter: Option<String>,

    /// Log record format.
    #[arg(long, value_enum, global = true, default_value_t = LogFormatKind::Compact)]
    log_format: LogFormatKind,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read the spreadsheet and submit its offers, once or on an interval.
    Sync(SyncArgs),
}

#[derive(clap::Args)]
struct SyncArgs {
    /// TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Spreadsheet to read.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Zero-based sheet index.
    #[arg(long)]
    sheet: Option<usize>,

    /// Submit every row, or only the first one.
    #[arg(long, value_enum)]
    mode: Option<ModeKind>,

    /// Treat the first row as data instead of a header.
    #[arg(long)]
    no_header: bool,

    /// API base URL; `{tenant}` is replaced by --tenant.
    #[arg(long, env = "INVENTORY_SYNC_BASE_URL")]
    base_url: Option<String>,

    /// Tenant substituted into the base URL.
    #[arg(long, env = "INVENTORY_SYNC_TENANT")]
    tenant: Option<String>,

    /// Static credential exchanged for an access token.
    #[arg(long, env = "INVENTORY_SYNC_CREDENTIAL", hide_env_values = true)]
    credential: Option<String>,

    /// HTTP request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Currency stamped on every price.
    #[arg(long)]
    currency: Option<String>,

    /// Supplier type stamped on every offer.
    #[arg(long)]
    supplier_type: Option<String>,

    /// Supplier name stamped on every offer.
    #[arg(long)]
    supplier_name: Option<String>,

    /// Keep running and repeat the sync on an interval.
    #[arg(long)]
    periodic: bool,

    /// Seconds between the end of one cycle and the start of the next.
    #[arg(long)]
    interval_secs: Option<u64>,
}

impl SyncArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            tenant: self.tenant.clone(),
            credential: self.credential.clone(),
            timeout_secs: self.timeout_secs,
            input: self.input.clone(),
            sheet_index: self.sheet,
            mode: self.mode.map(ReadMode::from),
            no_header: self.no_header,
            currency: self.currency.clone(),
            supplier_type: self.supplier_type.clone(),
            supplier_name: self.supplier_name.clone(),
            periodic: self.periodic,
            interval_secs: self.interval_secs,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeKind {
    Batch,
    Single,
}

impl From<ModeKind> for ReadMode {
    fn from(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Batch => ReadMode::Batch,
            ModeKind::Single => ReadMode::Single,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogFormatKind {
    Compact,
    Json,
}

impl From<LogFormatKind> for LogFormat {
    fn from(kind: LogFormatKind) -> Self {
        match kind {
            LogFormatKind::Compact => LogFormat::Compact,
            LogFormatKind::Json => LogFormat::Json,
        }
    }
}
