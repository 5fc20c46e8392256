//! Wallet provisioning and the insufficient-funds wrapper over the
//! store's conditional balance adjustment.

use purse_store::UnitOfWork;
use purse_types::{PurseError, Result, UserId, Wallet, WalletId};
use rust_decimal::Decimal;

/// Open a wallet for a new user with the given starting balance.
///
/// # Errors
/// - [`PurseError::ValidationFailed`] if `start_balance` is negative or
///   the user already has a wallet.
pub fn open(uow: &mut dyn UnitOfWork, user_id: UserId, start_balance: Decimal) -> Result<Wallet> {
    if start_balance < Decimal::ZERO {
        return Err(PurseError::ValidationFailed {
            reason: format!("starting balance must not be negative, got {start_balance}"),
        });
    }
    let wallet = Wallet::new(user_id, start_balance);
    uow.insert_wallet(wallet.clone())?;
    Ok(wallet)
}

/// Apply a signed delta to a wallet's balance.
///
/// Interprets the conditional adjustment's result: zero rows affected on a
/// negative delta means the guard rejected the debit, which surfaces as
/// [`PurseError::InsufficientFunds`] — an expected, recoverable business
/// failure, not a defect. A storage-level constraint violation at commit
/// is reported identically by the store.
///
/// A non-negative delta never raises; zero rows then just means the wallet
/// does not exist and there was nothing to credit.
///
/// # Errors
/// Returns [`PurseError::InsufficientFunds`] when a debit is rejected.
pub fn change_balance(uow: &mut dyn UnitOfWork, wallet_id: WalletId, delta: Decimal) -> Result<()> {
    let updated = uow.adjust_balance(wallet_id, delta);
    if delta < Decimal::ZERO && updated == 0 {
        return Err(PurseError::InsufficientFunds {
            wallet_id,
            debit: -delta,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use purse_store::{MemoryStore, Storage};

    #[test]
    fn open_wallet_persists_balance() {
        let store = MemoryStore::new();
        let user = UserId::new();
        let wallet = store
            .transaction(|uow| open(uow, user, Decimal::new(1000, 0)))
            .unwrap();
        assert_eq!(store.balance(wallet.id), Some(Decimal::new(1000, 0)));
    }

    #[test]
    fn open_wallet_rejects_negative_start() {
        let store = MemoryStore::new();
        let err = store
            .transaction(|uow| open(uow, UserId::new(), Decimal::new(-1, 0)))
            .unwrap_err();
        assert!(matches!(err, PurseError::ValidationFailed { .. }));
    }

    #[test]
    fn debit_with_cover_succeeds() {
        let store = MemoryStore::new();
        let wallet = store
            .transaction(|uow| open(uow, UserId::new(), Decimal::new(100, 0)))
            .unwrap();

        store
            .transaction(|uow| change_balance(uow, wallet.id, Decimal::new(-40, 0)))
            .unwrap();
        assert_eq!(store.balance(wallet.id), Some(Decimal::new(60, 0)));
    }

    #[test]
    fn uncovered_debit_raises_insufficient_funds() {
        let store = MemoryStore::new();
        let wallet = store
            .transaction(|uow| open(uow, UserId::new(), Decimal::new(50, 0)))
            .unwrap();

        let err = store
            .transaction(|uow| change_balance(uow, wallet.id, Decimal::new(-100, 0)))
            .unwrap_err();
        assert!(matches!(
            err,
            PurseError::InsufficientFunds { wallet_id, debit }
                if wallet_id == wallet.id && debit == Decimal::new(100, 0)
        ));
        // Balance unchanged.
        assert_eq!(store.balance(wallet.id), Some(Decimal::new(50, 0)));
    }

    #[test]
    fn credit_never_raises() {
        let store = MemoryStore::new();
        let wallet = store
            .transaction(|uow| open(uow, UserId::new(), Decimal::ZERO))
            .unwrap();

        store
            .transaction(|uow| change_balance(uow, wallet.id, Decimal::new(100, 0)))
            .unwrap();
        assert_eq!(store.balance(wallet.id), Some(Decimal::new(100, 0)));

        // Crediting an unknown wallet affects nothing and still succeeds.
        store
            .transaction(|uow| change_balance(uow, WalletId::new(), Decimal::ONE))
            .unwrap();
    }
}
