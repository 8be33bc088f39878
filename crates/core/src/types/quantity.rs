//! Inventory quantity adjustments.
//!
//! Purchases decrement a plant's stock and cancellations put it back. The
//! client sends an amount and a free-form status string; only the exact
//! string `"increase"` adds stock, everything else removes it.
//!
//! Stock is allowed to go negative: the adjustment is applied unconditionally
//! as a single increment in the store.

use serde::{Deserialize, Serialize};

/// The status string that selects [`QuantityDirection::Increase`].
pub const INCREASE: &str = "increase";

/// Which way a quantity adjustment moves the stock count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityDirection {
    Increase,
    Decrease,
}

impl QuantityDirection {
    /// Interpret the client's status string.
    ///
    /// The match is exact and case-sensitive: `"Increase"` or `"true"` both
    /// mean [`QuantityDirection::Decrease`].
    #[must_use]
    pub fn from_status(status: &str) -> Self {
        if status == INCREASE {
            Self::Increase
        } else {
            Self::Decrease
        }
    }
}

/// A requested change to a plant's stock count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityChange {
    amount: i64,
    direction: QuantityDirection,
}

impl QuantityChange {
    /// Create a change of `amount` units in `direction`.
    #[must_use]
    pub const fn new(amount: i64, direction: QuantityDirection) -> Self {
        Self { amount, direction }
    }

    /// Build a change from the request body fields.
    #[must_use]
    pub fn from_request(amount: i64, status: &str) -> Self {
        Self::new(amount, QuantityDirection::from_status(status))
    }

    /// The value to add to the stored quantity.
    #[must_use]
    pub const fn signed_delta(&self) -> i64 {
        match self.direction {
            QuantityDirection::Increase => self.amount,
            QuantityDirection::Decrease => self.amount.saturating_neg(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_adds_exact_amount() {
        let change = QuantityChange::from_request(5, "increase");
        assert_eq!(change, QuantityChange::new(5, QuantityDirection::Increase));
        assert_eq!(change.signed_delta(), 5);
    }

    #[test]
    fn test_any_other_status_decreases() {
        for status in ["decrease", "Increase", "INCREASE", "", "true", "increase "] {
            let change = QuantityChange::from_request(5, status);
            assert_eq!(
                change,
                QuantityChange::new(5, QuantityDirection::Decrease),
                "{status:?}"
            );
            assert_eq!(change.signed_delta(), -5);
        }
    }

    #[test]
    fn test_negative_amount_is_applied_verbatim() {
        let change = QuantityChange::from_request(-2, "increase");
        assert_eq!(change.signed_delta(), -2);

        let change = QuantityChange::from_request(-2, "decrease");
        assert_eq!(change.signed_delta(), 2);
    }

    #[test]
    fn test_extreme_amount_saturates() {
        let change = QuantityChange::from_request(i64::MIN, "decrease");
        assert_eq!(change.signed_delta(), i64::MAX);
    }
}
