//! PIX gateway command line client.
//!
//! # Architecture Overview
//!
//! ```text
//!   command ──▶ payments::PaymentApi ──▶ http::RequestExecutor
//!                                              │
//!                          ┌───────────────────┼────────────────────┐
//!                          ▼                   ▼                    ▼
//!                     route 0: direct    route 1..n: relays   (deadline per route)
//!                          │                   │
//!                          └──────▶ resilience::classify ◀──────────┘
//!                                         │
//!                             Payload | Credentials | Exhausted
//! ```
//!
//! Credentials come from the environment variables named in the config
//! (`PIX_GATEWAY_CLIENT_ID` / `PIX_GATEWAY_CLIENT_SECRET` by default).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use pix_gateway_client::config::{load_config, ClientConfig};
use pix_gateway_client::lifecycle::{signals, Session, Shutdown};
use pix_gateway_client::observability::{logging, metrics};
use pix_gateway_client::payments::keys::validate_withdrawal;
use pix_gateway_client::payments::{
    created_transaction_id, BalanceMonitor, CreateChargeParams, JsonFileHistory, PaymentStatusMonitor,
    PixKeyType, Wallet, WithdrawParams, WithdrawalHistory, WithdrawalRecord,
};

#[derive(Parser)]
#[command(name = "pix-gateway")]
#[command(about = "Client for the PIX payment gateway", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the wallet balance
    Balance,
    /// Fetch one transaction
    Transaction { id: String },
    /// Create a PIX charge
    Charge {
        amount: f64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        cpf: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Send a payout to a PIX key
    Withdraw {
        amount: f64,
        /// cpf, email, phone or random
        #[arg(long)]
        key_type: PixKeyType,
        #[arg(long)]
        pix_key: String,
        #[arg(long)]
        document: String,
        /// Do not fetch the balance before sending
        #[arg(long)]
        skip_balance_check: bool,
    },
    /// List recent withdrawals
    History,
    /// Print the balance every polling interval until Ctrl+C
    WatchBalance,
    /// Wait until a payment is settled
    WatchPayment { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("pix-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    match cli.command {
        Commands::History => {
            let history = JsonFileHistory::open(&config.history.path, config.history.max_entries)?;
            print_json(&history.entries())
        }
        command => {
            let session = Session::from_config(config)?;
            run_gateway(command, &session).await
        }
    }
}

async fn run_gateway(command: Commands, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let api = &session.api;

    match command {
        Commands::Balance => {
            let payload = api.get_wallet().await?;
            print_json(&Wallet::from_payload(&payload)?)?;
        }
        Commands::Transaction { id } => {
            print_json(&api.get_transaction(&id).await?)?;
        }
        Commands::Charge {
            amount,
            name,
            email,
            phone,
            cpf,
            description,
        } => {
            let params = CreateChargeParams {
                amount,
                name,
                email,
                phone,
                cpf,
                description,
            };
            print_json(&api.create_charge(&params).await?)?;
        }
        Commands::Withdraw {
            amount,
            key_type,
            pix_key,
            document,
            skip_balance_check,
        } => {
            let params = WithdrawParams {
                amount,
                key_type,
                pix_key,
                document,
            };
            let available = if skip_balance_check {
                None
            } else {
                let payload = api.get_wallet().await?;
                Some(Wallet::from_payload(&payload)?.balance)
            };
            validate_withdrawal(&params, available)?;

            let payload = api.withdraw(&params).await?;
            let history = JsonFileHistory::open(&session.config.history.path, session.config.history.max_entries)?;
            let record = WithdrawalRecord::success(created_transaction_id(&payload), params.amount, params.pix_key.trim());
            if let Err(e) = history.record(record) {
                tracing::warn!(error = %e, "Failed to save withdrawal history");
            }
            print_json(&payload)?;
        }
        Commands::WatchBalance => {
            let shutdown = Shutdown::new();
            let interval = Duration::from_secs(session.config.polling.balance_interval_secs);
            let (monitor, mut updates) = BalanceMonitor::new(api.clone(), interval);
            let task = tokio::spawn(monitor.run(shutdown.subscribe()));
            let ctrl_c = signals::shutdown_on_ctrl_c(&shutdown);
            tokio::pin!(ctrl_c);

            loop {
                tokio::select! {
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let latest = updates.borrow_and_update().clone();
                        if let Some(wallet) = latest {
                            print_json(&wallet)?;
                        }
                    }
                    _ = &mut ctrl_c => break,
                }
            }
            shutdown.trigger();
            let _ = task.await;
        }
        Commands::WatchPayment { id } => {
            let shutdown = Shutdown::new();
            let interval = Duration::from_secs(session.config.polling.payment_status_interval_secs);
            let monitor = PaymentStatusMonitor::new(api.clone(), id, interval);
            let mut task = tokio::spawn(monitor.run(shutdown.subscribe()));

            let status = tokio::select! {
                result = &mut task => result?,
                _ = signals::shutdown_on_ctrl_c(&shutdown) => task.await?,
            };
            match status {
                Some(status) => print_json(&serde_json::json!({ "status": status }))?,
                None => eprintln!("Stopped before the payment was settled"),
            }
        }
        // Needs no credentials; served by `run`.
        Commands::History => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
