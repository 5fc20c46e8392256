//! # purse-types
//!
//! Shared types, errors, and configuration for the **Purse** wallet
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UserId`], [`WalletId`], [`OrderId`], [`EntryId`], [`IdempotencyKey`]
//! - **Wallet model**: [`Wallet`]
//! - **Order model**: [`Order`], [`OrderStatus`] (the settlement state machine)
//! - **Ledger model**: [`LedgerEntry`], [`EntryKind`]
//! - **Configuration**: [`RetryPolicy`], [`WalletConfig`]
//! - **Errors**: [`PurseError`] with `PURSE_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod config;
pub mod constants;
pub mod entry;
pub mod error;
pub mod ids;
pub mod order;
pub mod wallet;

// Re-export all primary types at crate root for ergonomic imports:
//   use purse_types::{Order, OrderStatus, LedgerEntry, ...};

pub use config::*;
pub use entry::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use wallet::*;

// Constants are accessed via `purse_types::constants::FOO`
// (not re-exported to avoid name collisions).
