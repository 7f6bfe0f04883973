//! Process signal handling for the periodic loop.

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::inventory::error::{Result, SyncError};

/// Waits for Ctrl+C (or SIGTERM on Unix) and then fires `cancel`.
///
/// If a handler cannot be installed the token is left untouched, so the
/// loop keeps running under its supervisor.
pub async fn cancel_on_signal(cancel: CancellationToken) {
    match wait_for_signal().await {
        Ok(()) => cancel.cancel(),
        Err(error) => error!(%error, "failed to install shutdown signal handler"),
    }
}

async fn wait_for_signal() -> Result<()> {
    let ctrl_c = async {
        signal::ctrl_c().await?;
        Ok::<_, SyncError>(())
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())?
            .recv()
            .await;
        Ok::<_, SyncError>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        result = ctrl_c => {
            result?;
            info!("ctrl_c signal received");
        }
        result = terminate => {
            result?;
            info!("terminate signal received");
        }
    }
    Ok(())
}
