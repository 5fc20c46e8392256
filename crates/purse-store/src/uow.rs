//! Storage traits: the unit-of-work capability and the transaction opener.
//!
//! These are the dependency-injection seam of the engine. A saga never
//! names a concrete store; it is handed a `&mut dyn UnitOfWork` for the
//! duration of one atomic transaction and can only express its writes
//! through it.

use purse_types::{
    EntryId, LedgerEntry, Order, OrderId, Result, UserId, Wallet, WalletId,
};
use rust_decimal::Decimal;

/// Everything a saga may do inside one atomic transaction.
///
/// Mutations made through a unit of work become visible to other callers
/// only when the enclosing [`Storage::transaction`] commits; if it returns
/// an error, none of them survive.
pub trait UnitOfWork {
    // -----------------------------------------------------------------
    // Wallets
    // -----------------------------------------------------------------

    /// Insert a new wallet.
    ///
    /// # Errors
    /// Returns [`purse_types::PurseError::ValidationFailed`] if the user
    /// already has a wallet (one wallet per user).
    fn insert_wallet(&mut self, wallet: Wallet) -> Result<()>;

    /// Look up a user's wallet.
    fn wallet_for_user(&self, user_id: UserId) -> Option<Wallet>;

    /// Apply a signed delta to a wallet's balance, returning the number of
    /// rows affected.
    ///
    /// A non-negative delta succeeds unconditionally. A negative delta is
    /// guarded: it applies only when the current balance covers it, with
    /// guard check and update as one atomic step — there is no separate
    /// read-then-write window. Returns 1 on success, 0 when the guard
    /// rejected the debit or the wallet does not exist.
    ///
    /// This mutates the balance in place and writes no history; the ledger
    /// is the audit trail.
    fn adjust_balance(&mut self, id: WalletId, delta: Decimal) -> u64;

    // -----------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------

    /// Insert a new order.
    fn insert_order(&mut self, order: Order);

    /// Look up an order by id.
    fn order(&self, id: OrderId) -> Option<Order>;

    /// Persist a modified order.
    ///
    /// # Errors
    /// Returns [`purse_types::PurseError::OrderNotFound`] if the order was
    /// never inserted.
    fn update_order(&mut self, order: Order) -> Result<()>;

    // -----------------------------------------------------------------
    // Ledger (append-only)
    // -----------------------------------------------------------------

    /// Append a ledger entry.
    ///
    /// # Errors
    /// Returns [`purse_types::PurseError::DuplicateIdempotencyKey`] if an
    /// entry with the same idempotency key already exists. The existing
    /// entry is unaffected.
    fn insert_entry(&mut self, entry: LedgerEntry) -> Result<()>;

    /// Look up a ledger entry by id.
    fn entry(&self, id: EntryId) -> Option<LedgerEntry>;

    /// All entries recorded against an order, oldest first.
    fn entries_for_order(&self, order_id: OrderId) -> Vec<LedgerEntry>;

    /// All entries recorded against a wallet, oldest first.
    fn entries_for_wallet(&self, wallet_id: WalletId) -> Vec<LedgerEntry>;
}

/// Opens atomic transactions against a backing store.
///
/// Implementations must guarantee that the closure's writes commit as one
/// unit: an `Err` from the closure (or from commit-time validation)
/// discards every write made through the unit of work.
pub trait Storage: Send + Sync {
    /// Run `f` inside one atomic unit of work.
    ///
    /// # Errors
    /// Propagates any error from `f` unchanged, after rolling back.
    fn transaction<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<R>;
}
