//! Configuration types for the settlement engine and its task dispatcher.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Retry policy applied by the task dispatch layer.
///
/// This is deliberately *not* baked into the sagas: retrying an
/// insufficient-funds completion is a dispatch-policy decision, and the
/// saga itself stays a single-shot atomic unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries granted solely for `InsufficientFunds`.
    pub insufficient_funds_retries: u32,
    /// Delay between attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            insufficient_funds_retries: constants::DEFAULT_INSUFFICIENT_FUNDS_RETRIES,
            retry_delay_ms: constants::DEFAULT_RETRY_DELAY_MS,
        }
    }
}

/// Wallet provisioning configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Balance a freshly opened wallet starts with.
    pub start_balance: Decimal,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            start_balance: constants::DEFAULT_START_BALANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.insufficient_funds_retries, 1);
        assert_eq!(policy.retry_delay_ms, 0);
    }

    #[test]
    fn wallet_config_defaults() {
        let cfg = WalletConfig::default();
        assert_eq!(cfg.start_balance, Decimal::new(1000, 0));
    }

    #[test]
    fn config_serde_roundtrip() {
        let policy = RetryPolicy {
            insufficient_funds_retries: 3,
            retry_delay_ms: 250,
        };
        let json = serde_json::to_string(&policy).unwrap();
        let back: RetryPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, back);

        let cfg = WalletConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: WalletConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
