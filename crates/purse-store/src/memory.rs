//! In-memory transactional store.
//!
//! All state sits behind one mutex. A transaction clones the state, runs
//! the unit of work against the clone, and swaps it in only on success —
//! rollback is dropping the clone. The lock is held for the whole
//! transaction, so units of work touching the same wallet serialize and
//! the conditional adjustment's guard always reads the live balance.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use purse_types::{
    EntryId, IdempotencyKey, LedgerEntry, Order, OrderId, PurseError, Result, UserId, Wallet,
    WalletId,
};
use rust_decimal::Decimal;

use crate::uow::{Storage, UnitOfWork};

#[derive(Debug, Clone, Default)]
struct State {
    wallets: HashMap<WalletId, Wallet>,
    /// Unique index: one wallet per user.
    wallets_by_user: HashMap<UserId, WalletId>,
    orders: HashMap<OrderId, Order>,
    entries: HashMap<EntryId, LedgerEntry>,
    /// Unique index over ledger idempotency keys.
    used_keys: HashSet<IdempotencyKey>,
}

impl State {
    /// The storage-level check constraint: no wallet balance may be
    /// negative. Runs at commit, after the unit of work, as defense in
    /// depth behind the conditional adjustment's guard.
    fn check_balances(&self) -> Result<()> {
        for wallet in self.wallets.values() {
            if wallet.balance < Decimal::ZERO {
                // A violation is indistinguishable from a rejected debit
                // for callers: both mean the funds were not there.
                return Err(PurseError::InsufficientFunds {
                    wallet_id: wallet.id,
                    debit: -wallet.balance,
                });
            }
        }
        Ok(())
    }
}

/// In-process implementation of [`Storage`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------
    // Read-only accessors (queries and test assertions)
    // -----------------------------------------------------------------

    #[must_use]
    pub fn wallet(&self, id: WalletId) -> Option<Wallet> {
        self.lock().wallets.get(&id).cloned()
    }

    #[must_use]
    pub fn wallet_for_user(&self, user_id: UserId) -> Option<Wallet> {
        let state = self.lock();
        let id = state.wallets_by_user.get(&user_id)?;
        state.wallets.get(id).cloned()
    }

    /// Current balance, or `None` for an unknown wallet.
    #[must_use]
    pub fn balance(&self, id: WalletId) -> Option<Decimal> {
        self.lock().wallets.get(&id).map(|w| w.balance)
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.lock().orders.get(&id).cloned()
    }

    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<LedgerEntry> {
        self.lock().entries.get(&id).cloned()
    }

    /// All entries for an order, oldest first.
    #[must_use]
    pub fn entries_for_order(&self, order_id: OrderId) -> Vec<LedgerEntry> {
        let state = self.lock();
        let mut entries: Vec<LedgerEntry> = state
            .entries
            .values()
            .filter(|e| e.order_id == order_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.id);
        entries
    }

    /// All entries for a wallet, oldest first.
    #[must_use]
    pub fn entries_for_wallet(&self, wallet_id: WalletId) -> Vec<LedgerEntry> {
        let state = self.lock();
        let mut entries: Vec<LedgerEntry> = state
            .entries
            .values()
            .filter(|e| e.wallet_id == wallet_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.id);
        entries
    }

    /// Total number of ledger entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.lock().entries.len()
    }
}

impl Storage for MemoryStore {
    fn transaction<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<R>,
    {
        let mut committed = self.lock();
        let mut working = committed.clone();
        let result = f(&mut MemoryUow {
            state: &mut working,
        })?;
        working.check_balances()?;
        *committed = working;
        Ok(result)
    }
}

/// One transaction's working view of the store.
struct MemoryUow<'a> {
    state: &'a mut State,
}

impl UnitOfWork for MemoryUow<'_> {
    fn insert_wallet(&mut self, wallet: Wallet) -> Result<()> {
        if self.state.wallets_by_user.contains_key(&wallet.user_id) {
            return Err(PurseError::ValidationFailed {
                reason: format!("{} already has a wallet", wallet.user_id),
            });
        }
        self.state.wallets_by_user.insert(wallet.user_id, wallet.id);
        self.state.wallets.insert(wallet.id, wallet);
        Ok(())
    }

    fn wallet_for_user(&self, user_id: UserId) -> Option<Wallet> {
        let id = self.state.wallets_by_user.get(&user_id)?;
        self.state.wallets.get(id).cloned()
    }

    fn adjust_balance(&mut self, id: WalletId, delta: Decimal) -> u64 {
        // Guard and update are one step under the transaction's exclusive
        // view of the state: "UPDATE wallets SET balance = balance + delta
        // WHERE id = ? AND (delta >= 0 OR balance >= -delta)".
        match self.state.wallets.get_mut(&id) {
            Some(wallet) if delta >= Decimal::ZERO || wallet.balance >= -delta => {
                wallet.balance += delta;
                wallet.updated_at = Utc::now();
                1
            }
            _ => 0,
        }
    }

    fn insert_order(&mut self, order: Order) {
        self.state.orders.insert(order.id, order);
    }

    fn order(&self, id: OrderId) -> Option<Order> {
        self.state.orders.get(&id).cloned()
    }

    fn update_order(&mut self, order: Order) -> Result<()> {
        if !self.state.orders.contains_key(&order.id) {
            return Err(PurseError::OrderNotFound(order.id));
        }
        self.state.orders.insert(order.id, order);
        Ok(())
    }

    fn insert_entry(&mut self, entry: LedgerEntry) -> Result<()> {
        if self.state.used_keys.contains(&entry.idempotency_key) {
            return Err(PurseError::DuplicateIdempotencyKey(entry.idempotency_key));
        }
        self.state.used_keys.insert(entry.idempotency_key);
        self.state.entries.insert(entry.id, entry);
        Ok(())
    }

    fn entry(&self, id: EntryId) -> Option<LedgerEntry> {
        self.state.entries.get(&id).cloned()
    }

    fn entries_for_order(&self, order_id: OrderId) -> Vec<LedgerEntry> {
        let mut entries: Vec<LedgerEntry> = self
            .state
            .entries
            .values()
            .filter(|e| e.order_id == order_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.id);
        entries
    }

    fn entries_for_wallet(&self, wallet_id: WalletId) -> Vec<LedgerEntry> {
        let mut entries: Vec<LedgerEntry> = self
            .state
            .entries
            .values()
            .filter(|e| e.wallet_id == wallet_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.id);
        entries
    }
}
