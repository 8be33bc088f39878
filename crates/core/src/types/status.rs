//! Role and status enums for marketplace entities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marketplace role of a user.
///
/// Every user starts as a `Customer` on first login. Promotion to `Seller`
/// or `Admin` is done by an admin after the user requests it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Can browse plants and place orders.
    #[default]
    Customer,
    /// Can additionally list plants for sale.
    Seller,
    /// Can manage other users' roles.
    Admin,
}

impl UserRole {
    /// The string stored in the `role` field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Role-change status of a user.
///
/// Absence of the `status` field means no change is pending. Values other
/// than `Requested` written by other tools are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserStatus {
    /// The user asked to become a seller and is waiting for an admin.
    Requested,
    /// Any other stored value.
    Other(String),
}

impl UserStatus {
    /// The string stored in the `status` field.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Requested => "Requested",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for UserStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Requested" => Self::Requested,
            _ => Self::Other(s),
        }
    }
}

impl From<UserStatus> for String {
    fn from(status: UserStatus) -> Self {
        match status {
            UserStatus::Requested => "Requested".to_owned(),
            UserStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fulfillment status of an order.
///
/// Orders are written by the client, so the set of values is open; only
/// `Delivered` carries a rule (delivered orders cannot be cancelled).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Delivered,
    Other(String),
}

impl OrderStatus {
    /// The string stored in the `status` field.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Delivered => "Delivered",
            Self::Other(s) => s,
        }
    }

    /// Whether an order in this status may still be cancelled.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        !matches!(self, Self::Delivered)
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Pending" => Self::Pending,
            "In Progress" => Self::InProgress,
            "Delivered" => Self::Delivered,
            _ => Self::Other(s),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_parse_and_display() {
        for role in [UserRole::Customer, UserRole::Seller, UserRole::Admin] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert!("Admin".parse::<UserRole>().is_err());
        assert_eq!(UserRole::default(), UserRole::Customer);
    }

    #[test]
    fn test_user_role_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Seller).unwrap(), "\"seller\"");
        assert!(serde_json::from_str::<UserRole>("\"superuser\"").is_err());
    }

    #[test]
    fn test_user_status_keeps_unknown_values() {
        let status: UserStatus = serde_json::from_str("\"Requested\"").unwrap();
        assert_eq!(status, UserStatus::Requested);

        let status: UserStatus = serde_json::from_str("\"Verified\"").unwrap();
        assert_eq!(status, UserStatus::Other("Verified".to_owned()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Verified\"");
    }

    #[test]
    fn test_order_status_cancellable() {
        assert!(OrderStatus::Pending.is_cancellable());
        assert!(OrderStatus::InProgress.is_cancellable());
        assert!(OrderStatus::Other("Shipped".to_owned()).is_cancellable());
        assert!(!OrderStatus::Delivered.is_cancellable());
    }

    #[test]
    fn test_order_status_match_is_exact() {
        // Only the exact stored spelling blocks cancellation.
        assert!(OrderStatus::from("delivered".to_owned()).is_cancellable());
        assert!(!OrderStatus::from("Delivered".to_owned()).is_cancellable());
    }

    #[test]
    fn test_order_status_round_trips_stored_text() {
        let status: OrderStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(status, OrderStatus::InProgress);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"In Progress\"");
    }
}
