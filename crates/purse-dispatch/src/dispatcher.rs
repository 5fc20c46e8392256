//! Job dispatch with the retry policy around the sagas.

use std::thread;
use std::time::Duration;

use purse_settlement::SettlementEngine;
use purse_store::Storage;
use purse_types::{OrderId, Result, RetryPolicy};

use crate::job::Job;

/// What a successfully dispatched job settled, and how many saga runs it
/// took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The order the job acted on (for `CreateOrder`, the new order).
    pub order_id: OrderId,
    /// Saga attempts made, including the successful one.
    pub attempts: u32,
}

/// Runs [`Job`]s against a [`SettlementEngine`], re-attempting retryable
/// failures per the configured [`RetryPolicy`].
///
/// Only `InsufficientFunds` is retryable; a retry re-runs the whole saga
/// against current state. All other failures end the job on the first
/// attempt.
pub struct Dispatcher<S> {
    engine: SettlementEngine<S>,
    policy: RetryPolicy,
}

impl<S: Storage> Dispatcher<S> {
    /// Create a dispatcher with the default retry policy.
    #[must_use]
    pub fn new(engine: SettlementEngine<S>) -> Self {
        Self::with_policy(engine, RetryPolicy::default())
    }

    /// Create a dispatcher with an explicit retry policy.
    #[must_use]
    pub fn with_policy(engine: SettlementEngine<S>, policy: RetryPolicy) -> Self {
        Self { engine, policy }
    }

    /// The engine jobs are dispatched against.
    #[must_use]
    pub fn engine(&self) -> &SettlementEngine<S> {
        &self.engine
    }

    /// Run a job to completion under the retry policy.
    ///
    /// # Errors
    /// Returns the saga's final error once retries are exhausted, or
    /// immediately for non-retryable failures.
    pub fn dispatch(&self, job: Job) -> Result<DispatchOutcome> {
        let mut attempts: u32 = 1;
        loop {
            let result = self.run(job);
            match result {
                Ok(order_id) => {
                    return Ok(DispatchOutcome { order_id, attempts });
                }
                Err(err) if err.is_retryable() && attempts <= self.policy.insufficient_funds_retries => {
                    tracing::warn!(
                        job = %job,
                        error = %err,
                        attempt = attempts,
                        "retryable failure, re-running saga"
                    );
                    if self.policy.retry_delay_ms > 0 {
                        thread::sleep(Duration::from_millis(self.policy.retry_delay_ms));
                    }
                    attempts += 1;
                }
                Err(err) => {
                    tracing::error!(
                        job = %job,
                        error = %err,
                        attempts,
                        "job failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    fn run(&self, job: Job) -> Result<OrderId> {
        match job {
            Job::CreateOrder { user_id, amount } => {
                let order = self.engine.create_order(user_id, amount)?;
                Ok(order.id)
            }
            Job::CompleteOrder { order_id } => {
                self.engine.complete_order(order_id)?;
                Ok(order_id)
            }
            Job::CancelOrder { order_id } => {
                self.engine.cancel_order(order_id)?;
                Ok(order_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use purse_store::{MemoryStore, UnitOfWork};
    use purse_types::{OrderStatus, PurseError, UserId, WalletId};
    use rust_decimal::Decimal;

    use super::*;

    /// Storage wrapper that fails the next `armed` transactions with
    /// `InsufficientFunds` before delegating to the inner store.
    struct FlakyStore {
        inner: MemoryStore,
        armed: AtomicU32,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                armed: AtomicU32::new(0),
            }
        }

        fn fail_next(&self, n: u32) {
            self.armed.store(n, Ordering::SeqCst);
        }
    }

    impl Storage for FlakyStore {
        fn transaction<R, F>(&self, f: F) -> Result<R>
        where
            F: FnOnce(&mut dyn UnitOfWork) -> Result<R>,
        {
            if self
                .armed
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(PurseError::InsufficientFunds {
                    wallet_id: WalletId::new(),
                    debit: Decimal::ONE,
                });
            }
            self.inner.transaction(f)
        }
    }

    fn dispatcher_with_balance(balance: i64) -> (Dispatcher<MemoryStore>, UserId) {
        let engine = SettlementEngine::with_config(
            Arc::new(MemoryStore::new()),
            purse_types::WalletConfig {
                start_balance: Decimal::new(balance, 0),
            },
        );
        let user = UserId::new();
        engine.open_wallet(user).unwrap();
        (Dispatcher::new(engine), user)
    }

    #[test]
    fn dispatch_runs_the_full_lifecycle() {
        let (dispatcher, user) = dispatcher_with_balance(1000);

        let created = dispatcher
            .dispatch(Job::CreateOrder {
                user_id: user,
                amount: Decimal::new(300, 0),
            })
            .unwrap();
        assert_eq!(created.attempts, 1);

        let completed = dispatcher
            .dispatch(Job::CompleteOrder {
                order_id: created.order_id,
            })
            .unwrap();
        assert_eq!(completed.attempts, 1);
        assert_eq!(completed.order_id, created.order_id);

        dispatcher
            .dispatch(Job::CancelOrder {
                order_id: created.order_id,
            })
            .unwrap();

        let order = dispatcher.engine().order(created.order_id).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[test]
    fn insufficient_funds_retried_once_then_surfaced() {
        let (dispatcher, user) = dispatcher_with_balance(50);
        let order = dispatcher
            .engine()
            .create_order(user, Decimal::new(100, 0))
            .unwrap();

        let err = dispatcher
            .dispatch(Job::CompleteOrder { order_id: order.id })
            .unwrap_err();
        assert!(matches!(err, PurseError::InsufficientFunds { .. }));

        // Both attempts failed; the order never left Created.
        let order = dispatcher.engine().order(order.id).unwrap();
        assert_eq!(order.status, OrderStatus::Created);
    }

    #[test]
    fn transient_failure_succeeds_on_retry() {
        let store = Arc::new(FlakyStore::new());
        let engine = SettlementEngine::new(Arc::clone(&store));
        let user = UserId::new();
        engine.open_wallet(user).unwrap();
        let order = engine.create_order(user, Decimal::new(100, 0)).unwrap();

        let dispatcher = Dispatcher::new(engine);
        store.fail_next(1);

        let outcome = dispatcher
            .dispatch(Job::CompleteOrder { order_id: order.id })
            .unwrap();
        assert_eq!(outcome.attempts, 2, "first attempt fails, retry lands");

        let order = dispatcher.engine().order(order.id).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[test]
    fn non_retryable_failures_are_not_retried() {
        let store = Arc::new(FlakyStore::new());
        let engine = SettlementEngine::new(Arc::clone(&store));
        let dispatcher = Dispatcher::new(engine);

        let ghost = OrderId::new();
        let err = dispatcher
            .dispatch(Job::CompleteOrder { order_id: ghost })
            .unwrap_err();
        assert!(matches!(err, PurseError::OrderNotFound(id) if id == ghost));
        // The flaky counter was never armed and stays untouched.
        assert_eq!(store.armed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn zero_retry_policy_fails_fast() {
        let store = Arc::new(FlakyStore::new());
        let engine = SettlementEngine::new(Arc::clone(&store));
        let user = UserId::new();
        engine.open_wallet(user).unwrap();
        let order = engine.create_order(user, Decimal::new(100, 0)).unwrap();

        let dispatcher = Dispatcher::with_policy(
            engine,
            RetryPolicy {
                insufficient_funds_retries: 0,
                retry_delay_ms: 0,
            },
        );
        store.fail_next(1);

        let err = dispatcher
            .dispatch(Job::CompleteOrder { order_id: order.id })
            .unwrap_err();
        assert!(matches!(err, PurseError::InsufficientFunds { .. }));

        // The failure was consumed on the single attempt; no retry ran.
        let order = dispatcher.engine().order(order.id).unwrap();
        assert_eq!(order.status, OrderStatus::Created);
    }

    #[test]
    fn validation_failure_surfaces_from_create() {
        let (dispatcher, user) = dispatcher_with_balance(1000);
        let err = dispatcher
            .dispatch(Job::CreateOrder {
                user_id: user,
                amount: Decimal::ZERO,
            })
            .unwrap_err();
        assert!(matches!(err, PurseError::ValidationFailed { .. }));
    }
}
