use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use tokio::sync::watch;
use tokio::time;

use crate::config::Config;
use crate::filter::SecretFilter;
use crate::remote::RemoteStore;

use super::cycle::{sync_target, CycleOutcome};

/// Runs the periodic sync loop until `shutdown` fires.
///
/// Authenticates once before the first tick; an authentication failure is
/// terminal and no pass ever runs. While running, each elapsed interval
/// triggers one sequential pass over every configured target. The interval
/// is measured from the end of the previous wait, not a wall-clock grid, so
/// a slow pass delays the next tick by its own duration. Shutdown is
/// cooperative: it is observed only between passes, never by interrupting a
/// pass in flight.
pub async fn run_sync_loop<R: RemoteStore>(
    mut client: R,
    config: Config,
    filter: Option<SecretFilter>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    client
        .authenticate()
        .await
        .context("remote store authentication failed")?;
    info!("authenticated against {}", config.backend.url);

    let interval = Duration::from_secs(config.sync_interval_sec);
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                info!("sync loop stopped");
                return Ok(());
            }
            _ = time::sleep(interval) => {
                run_pass(&client, &config, filter.as_ref()).await;
            }
        }
    }
}

/// Authenticates and runs exactly one pass, for one-shot invocations.
pub async fn run_single_pass<R: RemoteStore>(
    mut client: R,
    config: &Config,
    filter: Option<&SecretFilter>,
) -> Result<()> {
    client
        .authenticate()
        .await
        .context("remote store authentication failed")?;
    run_pass(&client, config, filter).await;
    Ok(())
}

/// One sequential pass over all configured targets. A failure in one
/// target's cycle never blocks the targets after it.
pub async fn run_pass<R: RemoteStore>(
    client: &R,
    config: &Config,
    filter: Option<&SecretFilter>,
) {
    info!(
        "starting sync pass over {} history file(s)",
        config.history_files.len()
    );

    let mut synced = 0usize;
    let mut degraded = 0usize;
    for target in &config.history_files {
        match sync_target(client, target, filter).await.outcome {
            CycleOutcome::Synced => synced += 1,
            CycleOutcome::RemoteStale | CycleOutcome::Aborted => degraded += 1,
        }
    }

    info!("sync pass finished: {synced} synced, {degraded} degraded");
}
