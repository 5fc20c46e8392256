//! Wallet model: a user's stored monetary balance.
//!
//! The balance is mutated only through the store's conditional adjustment
//! primitive and never goes negative — guarded logically at the adjustment
//! and again by the store's commit-time check constraint.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{UserId, WalletId};

/// A single user's wallet. One per user, created alongside the user with a
/// starting balance; never deleted while its owner exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub user_id: UserId,
    /// Current balance; invariant: never negative.
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Build a wallet for `user_id` with the given starting balance.
    #[must_use]
    pub fn new(user_id: UserId, balance: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: WalletId::new(),
            user_id,
            balance,
            created_at: now,
            updated_at: now,
        }
    }
}
