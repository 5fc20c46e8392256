//! Order model and its settlement state machine.
//!
//! An order is a request to reserve and eventually settle a monetary
//! amount against its owner's wallet. Funds only move on completion —
//! creation has no balance or ledger effect.
//!
//! The state machine is a pure legality guard: it holds no business logic
//! beyond whether a transition is allowed, and it mutates nothing on a
//! rejected transition. The settlement sagas own the surrounding ledger
//! and balance writes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EntryId, OrderId, PurseError, Result, UserId};

/// Lifecycle status of an order.
///
/// `Created` is the initial state; `Cancelled` is fully terminal.
/// `complete` is only legal from `Created`, `cancel` only from `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Created,
    Completed,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A stateful record of a requested amount and its settlement lifecycle.
///
/// A `Completed` order references exactly one ledger entry — the purchase
/// debit that settled it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Requested amount; strictly positive.
    pub amount: Decimal,
    pub status: OrderStatus,
    /// The purchase debit that settled this order. Populated iff the order
    /// has reached `Completed` (and kept through `Cancelled`).
    pub purchase_entry_id: Option<EntryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a new order in `Created` state.
    ///
    /// # Errors
    /// Returns [`PurseError::ValidationFailed`] if `amount` is not strictly
    /// positive.
    pub fn new(user_id: UserId, amount: Decimal) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(PurseError::ValidationFailed {
                reason: format!("order amount must be positive, got {amount}"),
            });
        }
        let now = Utc::now();
        Ok(Self {
            id: OrderId::new(),
            user_id,
            amount,
            status: OrderStatus::Created,
            purchase_entry_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether `complete` is currently a legal transition.
    #[must_use]
    pub fn may_complete(&self) -> bool {
        self.status == OrderStatus::Created
    }

    /// Whether `cancel` is currently a legal transition.
    #[must_use]
    pub fn may_cancel(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// Transition `Created` → `Completed`, linking the purchase debit.
    ///
    /// The caller must have already written the ledger entry and applied
    /// the balance debit inside the same unit of work.
    ///
    /// # Errors
    /// Returns [`PurseError::InvalidOrderState`] from any other state;
    /// nothing is mutated on rejection.
    pub fn complete(&mut self, purchase_entry_id: EntryId) -> Result<()> {
        if !self.may_complete() {
            return Err(PurseError::InvalidOrderState {
                order_id: self.id,
                status: self.status,
                event: "complete",
            });
        }
        self.status = OrderStatus::Completed;
        self.purchase_entry_id = Some(purchase_entry_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Transition `Completed` → `Cancelled`.
    ///
    /// # Errors
    /// Returns [`PurseError::InvalidOrderState`] from any other state;
    /// nothing is mutated on rejection.
    pub fn cancel(&mut self) -> Result<()> {
        if !self.may_cancel() {
            return Err(PurseError::InvalidOrderState {
                order_id: self.id,
                status: self.status,
                event: "cancel",
            });
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }
}
