//! # purse-settlement
//!
//! **Settlement plane**: wallet provisioning, ledger operations, and the
//! three settlement sagas (Create, Complete, Cancel).
//!
//! ## Architecture
//!
//! Each saga is one atomic unit of work against the injected
//! [`Storage`](purse_store::Storage) backend:
//!
//! 1. Load the order and check transition legality
//! 2. Append the ledger entry (purchase debit, or reversal)
//! 3. Apply the conditional balance adjustment
//! 4. Persist the order's state transition
//!
//! Either all four commit or none do. A rejected debit surfaces as
//! `InsufficientFunds` and discards the already-buffered ledger entry
//! along with everything else — partial settlement is never observable.
//!
//! ## Saga flow
//!
//! ```text
//! dispatch → SettlementEngine::complete_order()
//!          → ledger::record(Purchase, -amount)
//!          → wallets::change_balance(-amount)   // guarded debit
//!          → Order::complete(entry_id)
//!          → commit
//! ```

pub mod engine;
pub mod ledger;
pub mod wallets;

pub use engine::SettlementEngine;
