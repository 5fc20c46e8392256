//! Settlement jobs: the serializable unit of work handed to the dispatcher.

use std::fmt;

use purse_types::{OrderId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A settlement job. Serializable so a queue backend can carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Job {
    /// Create a new order for `user_id` over `amount`.
    CreateOrder { user_id: UserId, amount: Decimal },
    /// Settle a created order against its owner's wallet.
    CompleteOrder { order_id: OrderId },
    /// Undo a completed order's settlement.
    CancelOrder { order_id: OrderId },
}

impl Job {
    /// Short label for logging.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateOrder { .. } => "create_order",
            Self::CompleteOrder { .. } => "complete_order",
            Self::CancelOrder { .. } => "cancel_order",
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateOrder { user_id, amount } => {
                write!(f, "create_order({user_id}, {amount})")
            }
            Self::CompleteOrder { order_id } => write!(f, "complete_order({order_id})"),
            Self::CancelOrder { order_id } => write!(f, "cancel_order({order_id})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_serde_is_tagged() {
        let job = Job::CompleteOrder {
            order_id: OrderId::new(),
        };
        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains(r#""kind":"complete_order""#));

        let back: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(job, back);
    }

    #[test]
    fn job_display_names_the_operation() {
        let user_id = UserId::new();
        let job = Job::CreateOrder {
            user_id,
            amount: Decimal::new(100, 0),
        };
        assert_eq!(job.label(), "create_order");
        assert!(job.to_string().starts_with("create_order("));
    }
}
