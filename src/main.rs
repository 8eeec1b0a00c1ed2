//! Solana account sync CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!   wallet session ──▶ AccountSync ──▶ getBalance ───────────────┐
//!   (WalletHandle)       │                                       ▼
//!                        └──────▶ getSignaturesForAddress ──▶ commit ──▶ DisplayState
//!                                   └─▶ getTransaction × N        (generation guard)
//!                                       (bounded fan-out)              │
//!                                                                      ▼
//!                                                              render_dashboard
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use account_sync::config::validation::validate_config;
use account_sync::config::{load_config, Cluster, ConfigError, DashboardConfig};
use account_sync::display::{format_balance, format_record, render_dashboard};
use account_sync::lifecycle::{signals, Shutdown};
use account_sync::observability::{init_tracing, metrics};
use account_sync::sync::{FetchOutcome, SyncStatus};
use account_sync::{AccountSync, Address, HttpRpcClient, WalletHandle, WalletSession};

#[derive(Parser)]
#[command(name = "account-sync")]
#[command(about = "Balance and transaction history for a Solana account", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RPC endpoint URL (overrides the cluster).
    #[arg(short, long)]
    url: Option<String>,

    /// Public cluster: devnet, testnet or mainnet-beta.
    #[arg(long)]
    cluster: Option<Cluster>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the account balance
    Balance { address: Address },
    /// Fetch recent transactions
    History { address: Address },
    /// Fetch balance and history and print the dashboard
    Dashboard { address: Address },
    /// Keep the dashboard refreshed until interrupted
    Watch {
        address: Address,
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(cluster) = cli.cluster {
        config.rpc.cluster = cluster;
    }
    if let Some(url) = cli.url {
        config.rpc.url = url;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_tracing(&config.observability);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let client = HttpRpcClient::new(&config.rpc)?;
    tracing::info!(
        endpoint = %client.endpoint(),
        max_concurrent_details = config.sync.max_concurrent_details,
        "account-sync v0.1.0 starting"
    );
    let sync = AccountSync::new(Arc::new(client), config.sync.clone());

    match cli.command {
        Commands::Balance { address } => {
            let session = WalletSession::connected(address);
            let Some(generation) = sync.begin(&session) else {
                return Ok(());
            };
            let outcome = sync.refresh_balance(&session, generation).await;
            check(outcome, "balance")?;
            println!("{}", format_balance(&sync.state().balance.value));
        }
        Commands::History { address } => {
            let session = WalletSession::connected(address);
            let Some(generation) = sync.begin(&session) else {
                return Ok(());
            };
            let history = sync.refresh_history(&session, generation).await;
            for failure in &history.failures {
                eprintln!("Lookup failed for {}: {}", failure.signature, failure.reason);
            }
            check(history.outcome, "transactions")?;

            let state = sync.state();
            if state.transactions.value.is_empty() {
                println!("No transactions.");
            }
            for record in &state.transactions.value {
                println!("{}\n", format_record(record));
            }
        }
        Commands::Dashboard { address } => {
            let session = WalletSession::connected(address);
            sync.refresh(&session).await;
            println!("{}", render_dashboard(&session, &sync.state()));
        }
        Commands::Watch {
            address,
            interval_secs,
        } => watch(sync, address, Duration::from_secs(interval_secs.max(1))).await,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Turn a failed commit into a CLI error.
fn check(outcome: FetchOutcome, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        FetchOutcome::Committed(SyncStatus::Failed { reason }) => {
            Err(format!("Error fetching {}: {}", what, reason).into())
        }
        _ => Ok(()),
    }
}

/// Drive the engine from a wallet session and reprint after every refresh.
async fn watch(sync: AccountSync, address: Address, interval: Duration) {
    let shutdown = Arc::new(Shutdown::new());
    let (wallet, watcher) = WalletHandle::new();

    wallet.connect(address);
    let engine = tokio::spawn(sync.clone().run(watcher, shutdown.subscribe()));
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { signals::shutdown_on_ctrl_c(&shutdown).await });
    }

    let mut stop = shutdown.subscribe();

    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;
    let mut printed = false;

    loop {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(50)), if !printed => {
                // Generation 0 means the engine task has not started yet
                if sync.generation() > 0 && sync.is_settled() {
                    println!("{}\n", render_dashboard(&wallet.current(), &sync.state()));
                    printed = true;
                }
            }
            _ = ticker.tick() => {
                sync.on_session_change(&wallet.current());
                printed = false;
            }
            _ = stop.recv() => break,
        }
    }

    wallet.disconnect();
    if let Err(e) = engine.await {
        tracing::error!(error = %e, "Account sync task failed");
    }
}
