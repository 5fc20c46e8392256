//! Ledger entry model: immutable, signed records of balance-affecting
//! events.
//!
//! The ledger is append-only. Entries are never mutated or deleted; undoing
//! an entry's effect means appending a new `Reversal` entry that negates it
//! and points back at it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EntryId, IdempotencyKey, OrderId, WalletId};

/// What kind of balance event an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum EntryKind {
    /// Funds added to the wallet.
    Deposit,
    /// The debit that settles an order.
    Purchase,
    /// Negation of a prior entry; always carries `reverses_id`.
    Reversal,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::Purchase => write!(f, "PURCHASE"),
            Self::Reversal => write!(f, "REVERSAL"),
        }
    }
}

/// One immutable wallet transaction.
///
/// The sign of `amount` encodes direction: negative debits the wallet,
/// positive credits it. The entry itself carries no balance — the wallet
/// row does; the ledger is the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub wallet_id: WalletId,
    pub order_id: OrderId,
    /// Signed amount; sign encodes direction.
    pub amount: Decimal,
    pub kind: EntryKind,
    /// Globally unique across the ledger.
    pub idempotency_key: IdempotencyKey,
    /// The entry this one negates. Required when `kind` is `Reversal`.
    pub reverses_id: Option<EntryId>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Build a new entry. The store assigns no fields — identity and
    /// timestamp are fixed here, at construction.
    #[must_use]
    pub fn new(
        wallet_id: WalletId,
        order_id: OrderId,
        amount: Decimal,
        kind: EntryKind,
        idempotency_key: IdempotencyKey,
        reverses_id: Option<EntryId>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            wallet_id,
            order_id,
            amount,
            kind,
            idempotency_key,
            reverses_id,
            created_at: Utc::now(),
        }
    }

    /// Build the entry that negates this one: same wallet and order, exact
    /// arithmetic negation of the amount, kind `Reversal`, pointing back at
    /// this entry. A fresh idempotency key is generated.
    #[must_use]
    pub fn reversal(&self) -> Self {
        Self::new(
            self.wallet_id,
            self.order_id,
            -self.amount,
            EntryKind::Reversal,
            IdempotencyKey::new(),
            Some(self.id),
        )
    }
}
