//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use retail_radar_core::{
    OrderId, OrderItemId, OrderNumber, OrderStatus, PaymentMethod, PaymentStatus, ProductId,
    UserId,
};

use super::user::UserSummary;

/// Where an order should be delivered.
///
/// Stored as a JSON document alongside the order. `phone` and `address` are
/// always present; the remaining fields are kept only when the customer
/// supplied them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// A placed order (domain type).
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Human-facing order number, unique across all orders.
    pub order_number: OrderNumber,
    /// ID of the customer who placed the order.
    pub customer_id: UserId,
    /// Sum of line totals at the prices captured when the order was placed.
    pub total_amount: Decimal,
    /// Fulfilment status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// How the customer pays.
    pub payment_method: PaymentMethod,
    /// Delivery address snapshot.
    pub delivery_address: DeliveryAddress,
    /// Optional free-text note from the customer.
    pub notes: Option<String>,
    /// Estimated delivery time, once one has been set.
    pub estimated_delivery: Option<DateTime<Utc>>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A single line of an order (domain type).
///
/// `price` is the unit price captured at placement time; later product price
/// changes do not affect existing orders. `product_id` becomes `None` when
/// the product has since been deleted.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// Unique line ID.
    pub id: OrderItemId,
    /// ID of the order this line belongs to.
    pub order_id: OrderId,
    /// Product reference, cleared when the product is deleted.
    pub product_id: Option<ProductId>,
    /// Units ordered, always at least 1.
    pub quantity: i32,
    /// Unit price at placement time.
    pub price: Decimal,
    /// Position of this line within the order, starting at 0.
    pub position: i32,
}

/// Abbreviated product object embedded in order lines.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemProductSummary {
    pub id: ProductId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Wire format for one order line.
///
/// `product` serializes as `null` (not omitted) when the product no longer
/// exists, so clients can still render the quantity and captured price.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub product: Option<OrderItemProductSummary>,
    pub quantity: i32,
    pub price: Decimal,
}

/// Wire format for an order with its customer and lines expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub customer: UserSummary,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub delivery_address: DeliveryAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderResponse {
    /// Combines an order with its customer summary and expanded lines.
    #[must_use]
    pub fn from_parts(
        order: Order,
        customer: UserSummary,
        items: Vec<OrderItemResponse>,
    ) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            customer,
            items,
            total_amount: order.total_amount,
            status: order.status,
            payment_status: order.payment_status,
            payment_method: order.payment_method,
            delivery_address: order.delivery_address,
            notes: order.notes,
            estimated_delivery: order.estimated_delivery,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use retail_radar_core::Email;
    use std::str::FromStr;

    fn sample_order() -> Order {
        Order {
            id: OrderId::new(11),
            order_number: OrderNumber::new("ORD1756100000000ABCD"),
            customer_id: UserId::new(5),
            total_amount: Decimal::from_str("73.50").unwrap(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Paid,
            payment_method: PaymentMethod::Upi,
            delivery_address: DeliveryAddress {
                name: Some("Jane".to_string()),
                phone: "5550002222".to_string(),
                address: "Hostel B, Room 214".to_string(),
                locality: None,
                pincode: None,
                instructions: None,
            },
            notes: None,
            estimated_delivery: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_order_response_wire_shape() {
        let customer = UserSummary {
            id: UserId::new(5),
            name: "Jane".to_string(),
            email: Email::parse("jane@example.com").unwrap(),
        };
        let items = vec![OrderItemResponse {
            product: Some(OrderItemProductSummary {
                id: ProductId::new(42),
                name: "Instant Noodles".to_string(),
                image_url: None,
            }),
            quantity: 3,
            price: Decimal::from_str("24.50").unwrap(),
        }];

        let json = serde_json::to_value(OrderResponse::from_parts(sample_order(), customer, items))
            .unwrap();
        assert_eq!(json["orderNumber"], "ORD1756100000000ABCD");
        assert_eq!(json["totalAmount"], "73.50");
        assert_eq!(json["paymentStatus"], "paid");
        assert_eq!(json["paymentMethod"], "upi");
        assert_eq!(json["items"][0]["quantity"], 3);
        assert_eq!(json["items"][0]["price"], "24.50");
        assert_eq!(json["items"][0]["product"]["id"], 42);
        // unset optionals are omitted, not null
        assert!(json.get("notes").is_none());
        assert!(json.get("estimatedDelivery").is_none());
    }

    #[test]
    fn test_deleted_product_serializes_as_null() {
        let customer = UserSummary {
            id: UserId::new(5),
            name: "Jane".to_string(),
            email: Email::parse("jane@example.com").unwrap(),
        };
        let items = vec![OrderItemResponse {
            product: None,
            quantity: 1,
            price: Decimal::from_str("10.00").unwrap(),
        }];

        let json = serde_json::to_value(OrderResponse::from_parts(sample_order(), customer, items))
            .unwrap();
        // product key must be present and null so clients can render the line
        assert!(json["items"][0]["product"].is_null());
    }

    #[test]
    fn test_delivery_address_roundtrip_skips_missing_fields() {
        let address = DeliveryAddress {
            name: None,
            phone: "5550002222".to_string(),
            address: "Hostel B, Room 214".to_string(),
            locality: Some("North Campus".to_string()),
            pincode: None,
            instructions: None,
        };

        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["phone"], "5550002222");
        assert_eq!(json["locality"], "North Campus");
        assert!(json.get("name").is_none());
        assert!(json.get("pincode").is_none());

        let back: DeliveryAddress = serde_json::from_value(json).unwrap();
        assert_eq!(back.address, "Hostel B, Room 214");
        assert!(back.instructions.is_none());
    }
}
