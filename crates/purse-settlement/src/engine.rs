//! The settlement engine: Create, Complete, and Cancel sagas.
//!
//! Each saga opens one transaction against the injected store, performs
//! all of its mutations through the unit of work, and commits or rolls
//! back as a whole. There is no in-process locking and nothing held across
//! transactions — a retried saga is a brand-new attempt against current
//! state, not a resumption.

use std::sync::Arc;

use purse_store::Storage;
use purse_types::{
    EntryKind, LedgerEntry, Order, OrderId, PurseError, Result, UserId, Wallet, WalletConfig,
    WalletId,
};
use rust_decimal::Decimal;

use crate::{ledger, wallets};

/// Orchestrates order settlement against a wallet store.
///
/// Cheap to clone; clones share the same backing store.
pub struct SettlementEngine<S> {
    store: Arc<S>,
    wallet_config: WalletConfig,
}

impl<S> Clone for SettlementEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            wallet_config: self.wallet_config,
        }
    }
}

impl<S: Storage> SettlementEngine<S> {
    /// Create an engine over `store` with default wallet provisioning.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, WalletConfig::default())
    }

    /// Create an engine with explicit wallet provisioning configuration.
    #[must_use]
    pub fn with_config(store: Arc<S>, wallet_config: WalletConfig) -> Self {
        Self {
            store,
            wallet_config,
        }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open a wallet for a new user with the configured starting balance.
    ///
    /// # Errors
    /// Returns [`PurseError::ValidationFailed`] if the user already has a
    /// wallet.
    pub fn open_wallet(&self, user_id: UserId) -> Result<Wallet> {
        let start_balance = self.wallet_config.start_balance;
        self.store
            .transaction(|uow| wallets::open(uow, user_id, start_balance))
    }

    /// Create saga: insert a new order in `Created` state.
    ///
    /// No ledger or balance effects — funds move only on completion.
    ///
    /// # Errors
    /// Returns [`PurseError::ValidationFailed`] for a non-positive amount.
    pub fn create_order(&self, user_id: UserId, amount: Decimal) -> Result<Order> {
        self.store.transaction(|uow| {
            let order = Order::new(user_id, amount)?;
            uow.insert_order(order.clone());
            Ok(order)
        })
    }

    /// Complete saga: settle the order against its owner's wallet.
    ///
    /// Atomically: record a `Purchase` entry of `-amount`, apply the
    /// guarded debit, and transition the order to `Completed` linking the
    /// entry. The ledger write comes first; if the debit is rejected the
    /// transaction rolls back and the entry never survives.
    ///
    /// # Errors
    /// - [`PurseError::OrderNotFound`] if the order does not exist
    /// - [`PurseError::InvalidOrderState`] unless the order is `Created`
    /// - [`PurseError::WalletNotFound`] if the owner has no wallet
    /// - [`PurseError::InsufficientFunds`] when the debit is rejected;
    ///   the order remains `Created` and the task layer may retry
    pub fn complete_order(&self, order_id: OrderId) -> Result<()> {
        let result = self.store.transaction(|uow| {
            let mut order = uow
                .order(order_id)
                .ok_or(PurseError::OrderNotFound(order_id))?;
            if !order.may_complete() {
                return Err(PurseError::InvalidOrderState {
                    order_id,
                    status: order.status,
                    event: "complete",
                });
            }
            let wallet = uow
                .wallet_for_user(order.user_id)
                .ok_or(PurseError::WalletNotFound(order.user_id))?;

            let debit = -order.amount;
            let entry = ledger::record(
                uow,
                wallet.id,
                order_id,
                debit,
                EntryKind::Purchase,
                None,
                None,
            )?;
            wallets::change_balance(uow, wallet.id, debit)?;
            order.complete(entry.id)?;
            uow.update_order(order)
        });

        if let Err(err) = &result {
            if !is_precondition(err) && !err.is_retryable() {
                tracing::error!(order = %order_id, error = %err, "failed to complete order");
            }
        }
        result
    }

    /// Cancel saga: undo a completed order's settlement.
    ///
    /// Atomically: append the reversal of the purchase entry, credit the
    /// wallet back, and transition the order to `Cancelled`. The credit
    /// cannot itself raise `InsufficientFunds` — the delta is positive.
    ///
    /// # Errors
    /// - [`PurseError::OrderNotFound`] if the order does not exist
    /// - [`PurseError::InvalidOrderState`] unless the order is `Completed`
    /// - [`PurseError::MissingLedgerEntry`] if the order lacks its
    ///   purchase entry (data-integrity fault; logged)
    pub fn cancel_order(&self, order_id: OrderId) -> Result<()> {
        let result = self.store.transaction(|uow| {
            let mut order = uow
                .order(order_id)
                .ok_or(PurseError::OrderNotFound(order_id))?;
            if !order.may_cancel() {
                return Err(PurseError::InvalidOrderState {
                    order_id,
                    status: order.status,
                    event: "cancel",
                });
            }
            let purchase_entry_id = order
                .purchase_entry_id
                .ok_or(PurseError::MissingLedgerEntry(order_id))?;
            let wallet = uow
                .wallet_for_user(order.user_id)
                .ok_or(PurseError::WalletNotFound(order.user_id))?;

            ledger::reverse(uow, purchase_entry_id)?;
            wallets::change_balance(uow, wallet.id, order.amount)?;
            order.cancel()?;
            uow.update_order(order)
        });

        if let Err(err) = &result {
            if !is_precondition(err) {
                tracing::error!(order = %order_id, error = %err, "failed to cancel order");
            }
        }
        result
    }

    // -----------------------------------------------------------------
    // Read-side queries
    // -----------------------------------------------------------------

    /// Look up an order.
    ///
    /// # Errors
    /// Returns [`PurseError::OrderNotFound`] if it does not exist.
    pub fn order(&self, order_id: OrderId) -> Result<Order> {
        self.store
            .transaction(|uow| uow.order(order_id).ok_or(PurseError::OrderNotFound(order_id)))
    }

    /// Look up a user's wallet.
    ///
    /// # Errors
    /// Returns [`PurseError::WalletNotFound`] if the user has none.
    pub fn wallet_for_user(&self, user_id: UserId) -> Result<Wallet> {
        self.store.transaction(|uow| {
            uow.wallet_for_user(user_id)
                .ok_or(PurseError::WalletNotFound(user_id))
        })
    }

    /// All ledger entries for a wallet, oldest first.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn transactions_for_wallet(&self, wallet_id: WalletId) -> Result<Vec<LedgerEntry>> {
        self.store
            .transaction(|uow| Ok(uow.entries_for_wallet(wallet_id)))
    }

    /// All ledger entries recorded against an order, oldest first.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn entries_for_order(&self, order_id: OrderId) -> Result<Vec<LedgerEntry>> {
        self.store
            .transaction(|uow| Ok(uow.entries_for_order(order_id)))
    }
}

/// Caller-side staleness rather than a persistence failure; surfaced but
/// not logged as an engine error.
fn is_precondition(err: &PurseError) -> bool {
    matches!(
        err,
        PurseError::OrderNotFound(_) | PurseError::InvalidOrderState { .. }
    )
}
