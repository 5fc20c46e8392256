//! Error taxonomy for the Purse settlement engine.
//!
//! All errors use the `PURSE_ERR_` prefix convention for easy grepping in
//! logs. Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Wallet / balance errors
//! - 3xx: Ledger errors
//! - 9xx: General / internal errors
//!
//! Sagas run inside one atomic unit of work, so any of these surfacing from
//! a saga means the whole unit was rolled back — partial writes are never
//! observable.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{EntryId, IdempotencyKey, OrderId, OrderStatus, UserId, WalletId};

/// Central error enum for all Purse operations.
#[derive(Debug, Error)]
pub enum PurseError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The requested order does not exist.
    #[error("PURSE_ERR_100: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Input violated an entity invariant (e.g., non-positive amount).
    #[error("PURSE_ERR_101: Validation failed: {reason}")]
    ValidationFailed { reason: String },

    /// The requested transition is illegal from the order's current state.
    /// Indicates caller-side staleness or a duplicate request.
    #[error("PURSE_ERR_102: Order {order_id} cannot {event} from status {status}")]
    InvalidOrderState {
        order_id: OrderId,
        status: OrderStatus,
        event: &'static str,
    },

    /// Cancellation was attempted on an order lacking its purchase entry.
    /// A completed order must always reference one — this is a
    /// data-integrity fault.
    #[error("PURSE_ERR_103: Order {0} has no purchase ledger entry")]
    MissingLedgerEntry(OrderId),

    // =================================================================
    // Wallet / Balance Errors (2xx)
    // =================================================================
    /// The conditional balance adjustment rejected a debit: applying it
    /// would have driven the balance below zero.
    #[error("PURSE_ERR_200: Insufficient funds in {wallet_id}: debit of {debit} rejected")]
    InsufficientFunds { wallet_id: WalletId, debit: Decimal },

    /// No wallet exists for the given user.
    #[error("PURSE_ERR_201: No wallet found for {0}")]
    WalletNotFound(UserId),

    // =================================================================
    // Ledger Errors (3xx)
    // =================================================================
    /// The referenced ledger entry does not exist.
    #[error("PURSE_ERR_300: Ledger entry not found: {0}")]
    EntryNotFound(EntryId),

    /// A ledger write collided with an existing idempotency key.
    /// Surfaced as a conflict, never silently ignored.
    #[error("PURSE_ERR_301: Duplicate idempotency key: {0}")]
    DuplicateIdempotencyKey(IdempotencyKey),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("PURSE_ERR_900: Internal error: {0}")]
    Internal(String),
}

impl PurseError {
    /// Whether the task layer may retry the operation that produced this
    /// error. Only [`PurseError::InsufficientFunds`] is retryable; every
    /// other condition indicates stale input, a conflict, or a defect.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InsufficientFunds { .. })
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PurseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = PurseError::OrderNotFound(OrderId::new());
        let msg = format!("{err}");
        assert!(msg.starts_with("PURSE_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn insufficient_funds_display() {
        let err = PurseError::InsufficientFunds {
            wallet_id: WalletId::new(),
            debit: Decimal::new(100, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("PURSE_ERR_200"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn invalid_order_state_display() {
        let err = PurseError::InvalidOrderState {
            order_id: OrderId::new(),
            status: OrderStatus::Cancelled,
            event: "complete",
        };
        let msg = format!("{err}");
        assert!(msg.contains("PURSE_ERR_102"));
        assert!(msg.contains("complete"));
        assert!(msg.contains("CANCELLED"));
    }

    #[test]
    fn only_insufficient_funds_is_retryable() {
        let retryable = PurseError::InsufficientFunds {
            wallet_id: WalletId::new(),
            debit: Decimal::ONE,
        };
        assert!(retryable.is_retryable());

        let errors: Vec<PurseError> = vec![
            PurseError::OrderNotFound(OrderId::new()),
            PurseError::ValidationFailed {
                reason: "test".into(),
            },
            PurseError::MissingLedgerEntry(OrderId::new()),
            PurseError::WalletNotFound(UserId::new()),
            PurseError::EntryNotFound(EntryId::new()),
            PurseError::DuplicateIdempotencyKey(IdempotencyKey::new()),
            PurseError::Internal("test".into()),
        ];
        for err in errors {
            assert!(!err.is_retryable(), "unexpectedly retryable: {err}");
        }
    }

    #[test]
    fn all_errors_have_purse_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(PurseError::OrderNotFound(OrderId::new())),
            Box::new(PurseError::WalletNotFound(UserId::new())),
            Box::new(PurseError::EntryNotFound(EntryId::new())),
            Box::new(PurseError::DuplicateIdempotencyKey(IdempotencyKey::new())),
            Box::new(PurseError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("PURSE_ERR_"),
                "Error missing PURSE_ERR_ prefix: {msg}"
            );
        }
    }
}
