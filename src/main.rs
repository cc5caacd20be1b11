//! Paradex Deposit Bot: Entry Point
//!
//! Initializes configuration, logging, the subscription store and the
//! Telegram and Starknet clients, then runs the deposit monitor and the
//! update poller until SIGINT/SIGTERM.
//!
//! Wiring sequence:
//! 1. Load `.env`, then config.toml (defaults if absent) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Read BOT_TOKEN from env
//! 4. Create shutdown channel, metrics registry and health state
//! 5. Open the JSON subscription store
//! 6. Create TelegramClient (Messenger port) and StarknetRpcClient (ChainClient port)
//! 7. Spawn health/metrics server (/live, /ready, /metrics)
//! 8. Spawn DepositMonitor loop
//! 9. Spawn UpdatePoller feeding the ConversationHandler
//! 10. Wait for SIGINT/SIGTERM → broadcast shutdown → join tasks

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use paradex_deposit_bot::adapters::chain::StarknetRpcClient;
use paradex_deposit_bot::adapters::metrics::{HealthServer, HealthState, MetricsRegistry};
use paradex_deposit_bot::adapters::persistence::JsonAlertStore;
use paradex_deposit_bot::adapters::telegram::{TelegramClient, UpdatePoller};
use paradex_deposit_bot::config;
use paradex_deposit_bot::usecases::conversation::ConversationHandler;
use paradex_deposit_bot::usecases::deposit_monitor::{DepositMonitor, PollSchedule};
use paradex_deposit_bot::usecases::notifier::Notifier;

/// Grace period for tasks to stop after the shutdown broadcast.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load .env and configuration ──────────────────────
    let dotenv = dotenvy::dotenv();
    let config = config::loader::load_or_default("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.bot.log_level)
                }),
        )
        .json()
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        rpc_url = %config.rpc.url,
        interval_s = config.polling.interval_seconds,
        "Starting Paradex deposit bot"
    );

    // ── 3. Bot token from env ───────────────────────────────
    let token = config::loader::bot_token_from_env()?;

    // ── 4. Shutdown channel + observability ─────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let metrics = MetricsRegistry::new().context("Failed to register metrics")?;
    let health = Arc::new(HealthState::new(Duration::from_secs(
        config.metrics.stale_after_seconds,
    )));

    // ── 5. Subscription store ───────────────────────────────
    let store = Arc::new(
        JsonAlertStore::open(&config.persistence.data_dir, &config.persistence.file_name)
            .await
            .context("Failed to open subscription store")?,
    );
    if !store.is_healthy().await {
        warn!(path = %store.path().display(), "Data directory is not writable");
    }

    // ── 6. Telegram + Starknet clients ──────────────────────
    let telegram = Arc::new(
        TelegramClient::new(&token, &config.telegram)
            .context("Failed to create Telegram client")?,
    );
    let chain = Arc::new(
        StarknetRpcClient::new(config.rpc.clone())
            .context("Failed to create Starknet RPC client")?
            .with_metrics(metrics.clone()),
    );

    // ── 7. Health/metrics server ────────────────────────────
    let health_handle = if config.metrics.enabled {
        let server = HealthServer::new(
            Arc::clone(&health),
            Some(metrics.clone()),
            config.metrics.bind_address.clone(),
        );
        let health_shutdown = shutdown_tx.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = server.run(health_shutdown).await {
                error!(error = %e, "Health server failed");
            }
        }))
    } else {
        None
    };

    // ── 8. Deposit monitor ──────────────────────────────────
    let notifier = Notifier::new(Arc::clone(&store), Arc::clone(&telegram))
        .with_metrics(metrics.clone());
    let monitor = DepositMonitor::new(chain, notifier, PollSchedule::from(&config.polling))
        .with_health(Arc::clone(&health))
        .with_metrics(metrics);
    let monitor_shutdown = shutdown_tx.subscribe();
    let monitor_handle = tokio::spawn(async move {
        monitor.run(monitor_shutdown).await;
    });

    // ── 9. Telegram update poller ───────────────────────────
    let handler = ConversationHandler::new(Arc::clone(&store), Arc::clone(&telegram));
    let poller = UpdatePoller::new(
        Arc::clone(&telegram),
        Duration::from_secs(config.telegram.error_backoff_seconds),
    );
    let poller_shutdown = shutdown_tx.subscribe();
    let poller_handle = tokio::spawn(async move {
        if let Err(e) = poller.run(&handler, poller_shutdown).await {
            error!(error = %e, "Update poller failed");
        }
    });

    info!("All tasks spawned, bot is running");

    // ── 10. Wait for SIGINT or SIGTERM ──────────────────────
    wait_for_signal().await;

    // ── Graceful shutdown ───────────────────────────────────
    let _ = shutdown_tx.send(());
    info!("Shutdown signal broadcast to all tasks");

    for (name, handle) in [("deposit_monitor", monitor_handle), ("update_poller", poller_handle)] {
        if tokio::time::timeout(SHUTDOWN_GRACE, handle).await.is_err() {
            warn!(task = name, "Task did not stop in time");
        }
    }

    if let Some(handle) = health_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolve on SIGINT, or SIGTERM on unix.
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                let _ = signal::ctrl_c().await;
                info!("SIGINT received, initiating graceful shutdown");
                return;
            }
        };

        tokio::select! {
            _ = signal::ctrl_c() => {
                info!("SIGINT received, initiating graceful shutdown");
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, initiating graceful shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = signal::ctrl_c().await;
        info!("SIGINT received, initiating graceful shutdown");
    }
}
