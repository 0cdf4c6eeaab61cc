use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;
use tokio::sync::watch;

use shellsync::config::{default_config_path, Config};
use shellsync::logger;
use shellsync::remote::FilebrowserClient;
use shellsync::sync;

#[derive(Parser)]
#[command(name = "shellsync")]
#[command(about = "Sync shell command history across machines via a Filebrowser backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration file (default: the platform config
    /// directory, e.g. ~/.config/shellsync/config.yaml)
    config: Option<PathBuf>,

    /// Run a single sync pass and exit instead of starting the scheduler
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)?;

    logger::init_logger(config.log_file.as_deref())?;

    let filter = config.build_filter()?;
    let client = FilebrowserClient::new(
        &config.backend,
        Duration::from_secs(config.request_timeout_sec),
    )?;

    if cli.once {
        return sync::run_single_pass(client, &config, filter.as_ref()).await;
    }

    println!(
        "{} syncing {} history file(s) every {}s against {}",
        "shellsync".cyan().bold(),
        config.history_files.len(),
        config.sync_interval_sec,
        config.backend.url
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut worker = tokio::spawn(sync::run_sync_loop(client, config, filter, shutdown_rx));

    tokio::select! {
        signal = shutdown_signal() => {
            info!("{signal} received, finishing any in-flight pass before exit");
            let _ = shutdown_tx.send(true);
            worker.await.context("sync worker panicked")??;
        }
        // The loop only returns on its own for a startup failure, which is
        // fatal to the process.
        result = &mut worker => {
            result.context("sync worker panicked")??;
        }
    }

    info!("sync client exited");
    Ok(())
}

/// Resolves when the process receives an interrupt or termination signal.
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
            return "interrupt";
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => "interrupt",
        _ = terminate.recv() => "termination signal",
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "interrupt"
}
