//! Status enums carried on orders.
//!
//! The shop API stores these as lowercase strings; the serde renames below
//! match its wire values exactly.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    #[default]
    Pending,
    /// Set on every order placed from checkout.
    Confirmed,
    InProcess,
    InShipping,
    Delivered,
    Rejected,
}

impl OrderStatus {
    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::InProcess => "In process",
            Self::InShipping => "In shipping",
            Self::Delivered => "Delivered",
            Self::Rejected => "Rejected",
        }
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    #[serde(rename = "cod")]
    CashOnDelivery,
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_status_wire_values() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Confirmed).ok(),
            Some(serde_json::json!("confirmed"))
        );
        assert_eq!(
            serde_json::to_value(PaymentMethod::CashOnDelivery).ok(),
            Some(serde_json::json!("cod"))
        );
        assert_eq!(
            serde_json::to_value(PaymentStatus::Pending).ok(),
            Some(serde_json::json!("pending"))
        );
    }

    #[test]
    fn test_order_status_parses_multi_word_values() {
        let status: OrderStatus = serde_json::from_str("\"inShipping\"").unwrap_or_default();
        assert_eq!(status, OrderStatus::InShipping);
    }
}
