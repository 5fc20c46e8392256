//! Ledger operations: append entries and compute reversals.
//!
//! History is never edited. Reversing an entry appends a new, independent
//! entry with the exact negated amount and a back-reference; the original
//! is untouched.

use purse_store::UnitOfWork;
use purse_types::{
    EntryId, EntryKind, IdempotencyKey, LedgerEntry, OrderId, PurseError, Result, WalletId,
};
use rust_decimal::Decimal;

/// Append a ledger entry.
///
/// When `idempotency_key` is `None`, a fresh one is generated. Supplying a
/// key that already exists in the ledger fails the write.
///
/// # Errors
/// Returns [`PurseError::DuplicateIdempotencyKey`] on a key collision; the
/// existing entry is unaffected.
pub fn record(
    uow: &mut dyn UnitOfWork,
    wallet_id: WalletId,
    order_id: OrderId,
    amount: Decimal,
    kind: EntryKind,
    idempotency_key: Option<IdempotencyKey>,
    reverses_id: Option<EntryId>,
) -> Result<LedgerEntry> {
    let entry = LedgerEntry::new(
        wallet_id,
        order_id,
        amount,
        kind,
        idempotency_key.unwrap_or_else(IdempotencyKey::new),
        reverses_id,
    );
    uow.insert_entry(entry.clone())?;
    Ok(entry)
}

/// Append the reversal of an existing entry: same wallet and order, amount
/// negated, kind `Reversal`, `reverses_id` pointing at the original.
///
/// # Errors
/// Returns [`PurseError::EntryNotFound`] if `entry_id` does not exist.
pub fn reverse(uow: &mut dyn UnitOfWork, entry_id: EntryId) -> Result<LedgerEntry> {
    let original = uow
        .entry(entry_id)
        .ok_or(PurseError::EntryNotFound(entry_id))?;
    let reversal = original.reversal();
    uow.insert_entry(reversal.clone())?;
    Ok(reversal)
}
