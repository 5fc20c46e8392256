//! # purse-store
//!
//! **Storage plane**: the transactional backing store for wallets, orders,
//! and the append-only ledger.
//!
//! ## Architecture
//!
//! Two seams, both defined here:
//! 1. [`UnitOfWork`]: everything a saga may do inside one atomic
//!    transaction — wallet lookup, the conditional balance adjustment,
//!    order reads/writes, and ledger appends.
//! 2. [`Storage`]: opens a transaction and runs a closure against it;
//!    all writes commit together or not at all.
//!
//! The settlement engine receives a `Storage` implementation at
//! construction time. [`MemoryStore`] is the in-process implementation:
//! state lives behind a mutex, a transaction works on a clone, and commit
//! swaps the clone in — rollback is simply dropping it.
//!
//! ## Consistency model
//!
//! The conditional adjustment checks its guard against the live balance as
//! part of the same atomic operation that applies the delta, and the store
//! serializes units of work touching the same state, so concurrent debits
//! against one wallet can never jointly overdraw it. Commit additionally
//! revalidates the `balance >= 0` check constraint as defense in depth.

pub mod memory;
pub mod uow;

pub use memory::MemoryStore;
pub use uow::{Storage, UnitOfWork};
