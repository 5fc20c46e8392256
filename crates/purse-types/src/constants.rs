//! System-wide constants for the Purse settlement engine.

use rust_decimal::Decimal;

/// Starting balance credited to a wallet created alongside a new user.
pub const DEFAULT_START_BALANCE: Decimal = Decimal::ONE_THOUSAND;

/// How many times the task layer retries a settlement that failed with
/// `InsufficientFunds`. Other failures are never retried automatically.
pub const DEFAULT_INSUFFICIENT_FUNDS_RETRIES: u32 = 1;

/// Delay between insufficient-funds retries, in milliseconds. Zero: the
/// caller is expected to have inspected the balance before retrying.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 0;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Purse";
