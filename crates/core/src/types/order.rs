//! Order lifecycle types: status enums, payment fields, and order numbers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// The usual progression is pending → confirmed → preparing → ready →
/// delivered, with cancelled as an exit at any point. There is no enforced
/// transition machine: store owners may set any status directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The wire/database representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    /// The wire/database representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

/// How the customer pays for an order.
///
/// There is no payment processor integration: the method only determines the
/// initial [`PaymentStatus`] via [`PaymentMethod::settles_immediately`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Cod,
    Card,
    Upi,
    Online,
}

impl PaymentMethod {
    /// The wire/database representation of this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Cod => "cod",
            Self::Card => "card",
            Self::Upi => "upi",
            Self::Online => "online",
        }
    }

    /// Whether payment is collected at order time.
    ///
    /// Cash-like methods (cash, cash on delivery) are collected on handover,
    /// so the order starts with payment pending; electronic methods are
    /// treated as settled up front.
    #[must_use]
    pub const fn settles_immediately(self) -> bool {
        !matches!(self, Self::Cash | Self::Cod)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "cod" => Ok(Self::Cod),
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            "online" => Ok(Self::Online),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// A human-facing order reference like `ORD1756100000000KX7Q`.
///
/// Generated at placement time from a millisecond timestamp plus a short
/// random suffix; the database enforces uniqueness as the backstop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Prefix shared by all generated order numbers.
    pub const PREFIX: &'static str = "ORD";

    /// Wrap an already-generated order number.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `OrderNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_order_status_rejects_unknown() {
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_payment_status_default_pending() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }

    #[test]
    fn test_cash_like_methods_do_not_settle() {
        assert!(!PaymentMethod::Cash.settles_immediately());
        assert!(!PaymentMethod::Cod.settles_immediately());
    }

    #[test]
    fn test_electronic_methods_settle_immediately() {
        assert!(PaymentMethod::Card.settles_immediately());
        assert!(PaymentMethod::Upi.settles_immediately());
        assert!(PaymentMethod::Online.settles_immediately());
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Upi).unwrap(),
            "\"upi\""
        );
        assert_eq!(
            serde_json::from_str::<PaymentMethod>("\"cod\"").unwrap(),
            PaymentMethod::Cod
        );
    }

    #[test]
    fn test_order_number_serde_transparent() {
        let number = OrderNumber::new("ORD1700000000000ABCD");
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"ORD1700000000000ABCD\"");
        assert_eq!(serde_json::from_str::<OrderNumber>(&json).unwrap(), number);
    }
}
