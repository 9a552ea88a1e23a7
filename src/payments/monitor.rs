//! Background pollers for wallet balance and payment status.
//!
//! # Design Decisions
//! - Each poller is an explicit task owning its interval; the owner passes a
//!   shutdown receiver and triggers it when the view goes away
//! - Errors are logged at debug and dropped; a flaky relay must not reach the UI
//! - Each tick is an independent executor invocation

use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::{self, MissedTickBehavior};

use crate::observability::metrics;
use crate::payments::operations::PaymentApi;
use crate::payments::types::{PaymentResult, TransactionStatus, TransactionView, Wallet};

/// Periodically refreshes the wallet balance.
pub struct BalanceMonitor {
    api: PaymentApi,
    interval: Duration,
    update_tx: watch::Sender<Option<Wallet>>,
}

impl BalanceMonitor {
    /// Create a monitor and the receiver on which fresh balances are published.
    pub fn new(api: PaymentApi, interval: Duration) -> (Self, watch::Receiver<Option<Wallet>>) {
        let (update_tx, update_rx) = watch::channel(None);
        (
            Self {
                api,
                interval,
                update_tx,
            },
            update_rx,
        )
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Balance monitor starting");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Balance monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn refresh(&self) {
        let wallet: PaymentResult<Wallet> = match self.api.get_wallet().await {
            Ok(payload) => Wallet::from_payload(&payload).map_err(Into::into),
            Err(e) => Err(e),
        };

        match wallet {
            Ok(wallet) => {
                tracing::debug!(balance = wallet.balance, currency = %wallet.currency, "Balance refreshed");
                self.update_tx.send_replace(Some(wallet));
            }
            Err(e) => {
                metrics::record_poll_error("balance");
                tracing::debug!(error = %e, "Balance refresh failed, ignoring");
            }
        }
    }
}

/// Polls one transaction until it is settled.
pub struct PaymentStatusMonitor {
    api: PaymentApi,
    transaction_id: String,
    interval: Duration,
}

impl PaymentStatusMonitor {
    pub fn new(api: PaymentApi, transaction_id: impl Into<String>, interval: Duration) -> Self {
        Self {
            api,
            transaction_id: transaction_id.into(),
            interval,
        }
    }

    /// Poll until settled (returns the settled status) or shut down (returns `None`).
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Option<TransactionStatus> {
        tracing::info!(
            transaction_id = %self.transaction_id,
            interval_secs = self.interval.as_secs(),
            "Payment status monitor starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(status) = self.check().await {
                        tracing::info!(transaction_id = %self.transaction_id, ?status, "Payment settled");
                        return Some(status);
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Payment status monitor received shutdown signal, exiting loop");
                    return None;
                }
            }
        }
    }

    async fn check(&self) -> Option<TransactionStatus> {
        let view: PaymentResult<TransactionView> = match self.api.get_transaction(&self.transaction_id).await {
            Ok(payload) => TransactionView::from_payload(&payload).map_err(Into::into),
            Err(e) => Err(e),
        };

        match view {
            Ok(view) if view.status.is_settled() => Some(view.status),
            Ok(view) => {
                tracing::debug!(transaction_id = %self.transaction_id, status = ?view.status, "Payment not settled yet");
                None
            }
            Err(e) => {
                metrics::record_poll_error("payment_status");
                tracing::debug!(error = %e, "Payment status check failed, ignoring");
                None
            }
        }
    }
}
