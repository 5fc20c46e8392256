//! # purse-dispatch
//!
//! **Dispatch plane**: the job vocabulary and the retry policy wrapped
//! around the settlement sagas.
//!
//! The sagas in `purse-settlement` are single-shot atomic units of work.
//! This crate decides what happens when one of them fails: retryable
//! failures (only `InsufficientFunds`) are re-attempted per
//! [`RetryPolicy`](purse_types::RetryPolicy), everything else fails the
//! job immediately. A retry is a fresh saga run against current state,
//! never a resumption of a half-done one.

pub mod dispatcher;
pub mod job;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use job::Job;
