//! Payment operations subsystem.
//!
//! # Data Flow
//! ```text
//! caller params
//!     → keys.rs (PIX key / amount / id checks, external id)
//!     → operations.rs (request body + URL, one executor call)
//!     → types.rs (typed views over the payload)
//!
//! background:
//!     monitor.rs (balance refresh, payment status polling)
//!     history.rs (recent withdrawals on disk)
//! ```

pub mod history;
pub mod keys;
pub mod monitor;
pub mod operations;
pub mod types;

pub use history::{JsonFileHistory, WithdrawalHistory, WithdrawalRecord};
pub use monitor::{BalanceMonitor, PaymentStatusMonitor};
pub use operations::{created_transaction_id, PaymentApi};
pub use types::{
    CreateChargeParams, PaymentError, PaymentResult, PixKeyType, TransactionStatus, TransactionView,
    Wallet, WithdrawParams,
};
