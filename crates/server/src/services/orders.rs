//! Order placement and the stock reservation flow.
//!
//! Placement validates the request shape, derives the initial payment status
//! from the payment method, generates an order number, and hands the
//! validated lines to the repository, which decrements stock and writes the
//! order in a single transaction.

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use retail_radar_core::{OrderNumber, PaymentMethod, PaymentStatus, ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::orders::{
    OrderLine, OrderPlacementError, OrderRepository, OrderWithDetails, PlaceOrder,
};
use crate::models::order::DeliveryAddress;

/// Random suffix length appended to order numbers.
const ORDER_SUFFIX_LEN: usize = 4;

/// Order placement request body.
///
/// Every section is optional at the type level so a missing section produces
/// its specific error below instead of a generic deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderInput {
    pub items: Option<Vec<OrderItemInput>>,
    pub delivery_address: Option<DeliveryAddressInput>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// One requested line: a product and a quantity.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: i32,
    pub quantity: i32,
}

/// Delivery address as submitted.
///
/// `phone` and `address` are checked for presence before the order is
/// accepted; the rest is stored as given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryAddressInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Failures that can occur while placing an order.
///
/// Display strings double as the user-facing error messages.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request had no items array, or an empty one.
    #[error("Items are required")]
    ItemsRequired,

    /// The delivery address is missing its phone or street address.
    #[error("Complete delivery address is required")]
    IncompleteDeliveryAddress,

    /// No payment method was given.
    #[error("Payment method is required")]
    PaymentMethodRequired,

    /// The payment method is not one of the accepted values.
    #[error("Invalid payment method")]
    InvalidPaymentMethod,

    /// A line asked for fewer than one unit.
    #[error("Item quantity must be at least 1")]
    InvalidQuantity,

    /// A line references a product that does not exist.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// A line's quantity exceeds the product's current stock.
    #[error("Insufficient stock for {0}")]
    InsufficientStock(String),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<OrderPlacementError> for OrderError {
    fn from(err: OrderPlacementError) -> Self {
        match err {
            OrderPlacementError::ProductNotFound(id) => Self::ProductNotFound(id),
            OrderPlacementError::InsufficientStock(name) => Self::InsufficientStock(name),
            OrderPlacementError::Repository(e) => Self::Repository(e),
        }
    }
}

/// Order placement service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for the given customer.
    ///
    /// Returns the created order with its customer and product fields
    /// expanded for display.
    ///
    /// # Errors
    ///
    /// Returns the validation errors above for a malformed request,
    /// `OrderError::ProductNotFound`/`OrderError::InsufficientStock` when a
    /// line cannot be satisfied, and `OrderError::Repository` for database
    /// failures. Line failures roll back the entire placement.
    #[instrument(skip(self, customer_id, input), fields(customer_id = customer_id.as_i32()))]
    pub async fn place(
        &self,
        customer_id: UserId,
        input: PlaceOrderInput,
    ) -> Result<OrderWithDetails, OrderError> {
        let validated = validate(input)?;

        let params = PlaceOrder {
            order_number: generate_order_number(),
            customer_id,
            items: validated.items,
            payment_method: validated.payment_method,
            payment_status: initial_payment_status(validated.payment_method),
            delivery_address: validated.delivery_address,
            notes: validated.notes,
        };

        let order_id = self.orders.place(params).await?;

        // Re-read through the joins so the response carries the expanded
        // customer and product fields.
        self.orders
            .get_with_details(order_id)
            .await?
            .ok_or(OrderError::Repository(RepositoryError::NotFound))
    }
}

/// A placement request that passed shape validation.
struct ValidatedOrder {
    items: Vec<OrderLine>,
    delivery_address: DeliveryAddress,
    payment_method: PaymentMethod,
    notes: Option<String>,
}

fn validate(input: PlaceOrderInput) -> Result<ValidatedOrder, OrderError> {
    let items = match input.items {
        Some(items) if !items.is_empty() => items,
        _ => return Err(OrderError::ItemsRequired),
    };

    let items = items
        .into_iter()
        .map(|item| {
            if item.quantity < 1 {
                return Err(OrderError::InvalidQuantity);
            }
            Ok(OrderLine {
                product_id: ProductId::new(item.product_id),
                quantity: item.quantity,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let delivery_address = validate_address(input.delivery_address)?;

    let payment_method = input
        .payment_method
        .filter(|m| !m.trim().is_empty())
        .ok_or(OrderError::PaymentMethodRequired)?
        .parse::<PaymentMethod>()
        .map_err(|_| OrderError::InvalidPaymentMethod)?;

    Ok(ValidatedOrder {
        items,
        delivery_address,
        payment_method,
        notes: input.notes,
    })
}

/// A usable address needs at least a non-blank phone and street address.
fn validate_address(input: Option<DeliveryAddressInput>) -> Result<DeliveryAddress, OrderError> {
    let input = input.ok_or(OrderError::IncompleteDeliveryAddress)?;

    let phone = input.phone.filter(|p| !p.trim().is_empty());
    let address = input.address.filter(|a| !a.trim().is_empty());
    let (Some(phone), Some(address)) = (phone, address) else {
        return Err(OrderError::IncompleteDeliveryAddress);
    };

    Ok(DeliveryAddress {
        name: input.name,
        phone,
        address,
        locality: input.locality,
        pincode: input.pincode,
        instructions: input.instructions,
    })
}

/// Initial payment status for a new order.
///
/// Cash-like methods are collected on handover, so they start pending;
/// everything else is treated as settled at placement.
const fn initial_payment_status(method: PaymentMethod) -> PaymentStatus {
    if method.settles_immediately() {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Pending
    }
}

/// Generate an order number: `ORD` + millisecond timestamp + random suffix.
///
/// The suffix keeps two orders placed in the same millisecond apart; the
/// unique index on `order_number` is the backstop.
fn generate_order_number() -> OrderNumber {
    let mut rng = rand::rng();
    let suffix: String = (0..ORDER_SUFFIX_LEN)
        .map(|_| match rng.random_range(0u8..36) {
            d @ 0..=9 => char::from(b'0' + d),
            d => char::from(b'A' + d - 10),
        })
        .collect();

    OrderNumber::new(format!(
        "{}{}{}",
        OrderNumber::PREFIX,
        Utc::now().timestamp_millis(),
        suffix
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete_address() -> DeliveryAddressInput {
        DeliveryAddressInput {
            phone: Some("5550002222".to_string()),
            address: Some("Hostel B, Room 214".to_string()),
            ..DeliveryAddressInput::default()
        }
    }

    fn valid_input() -> PlaceOrderInput {
        PlaceOrderInput {
            items: Some(vec![OrderItemInput {
                product_id: 1,
                quantity: 2,
            }]),
            delivery_address: Some(complete_address()),
            payment_method: Some("upi".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        let validated = validate(valid_input()).unwrap();
        assert_eq!(validated.items.len(), 1);
        assert_eq!(validated.payment_method, PaymentMethod::Upi);
        assert_eq!(validated.delivery_address.phone, "5550002222");
    }

    #[test]
    fn test_validate_requires_items() {
        let mut input = valid_input();
        input.items = None;
        assert!(matches!(validate(input), Err(OrderError::ItemsRequired)));

        let mut input = valid_input();
        input.items = Some(vec![]);
        assert!(matches!(validate(input), Err(OrderError::ItemsRequired)));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let mut input = valid_input();
        input.items = Some(vec![OrderItemInput {
            product_id: 1,
            quantity: 0,
        }]);
        assert!(matches!(validate(input), Err(OrderError::InvalidQuantity)));
    }

    #[test]
    fn test_validate_requires_complete_address() {
        let mut input = valid_input();
        input.delivery_address = None;
        assert!(matches!(
            validate(input),
            Err(OrderError::IncompleteDeliveryAddress)
        ));

        // Blank strings count as missing, not merely whitespace-padded.
        let mut input = valid_input();
        input.delivery_address = Some(DeliveryAddressInput {
            phone: Some("   ".to_string()),
            address: Some("Hostel B".to_string()),
            ..DeliveryAddressInput::default()
        });
        assert!(matches!(
            validate(input),
            Err(OrderError::IncompleteDeliveryAddress)
        ));
    }

    #[test]
    fn test_validate_requires_payment_method() {
        let mut input = valid_input();
        input.payment_method = None;
        assert!(matches!(
            validate(input),
            Err(OrderError::PaymentMethodRequired)
        ));

        let mut input = valid_input();
        input.payment_method = Some(String::new());
        assert!(matches!(
            validate(input),
            Err(OrderError::PaymentMethodRequired)
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_payment_method() {
        let mut input = valid_input();
        input.payment_method = Some("cheque".to_string());
        assert!(matches!(
            validate(input),
            Err(OrderError::InvalidPaymentMethod)
        ));
    }

    #[test]
    fn test_initial_payment_status() {
        assert_eq!(
            initial_payment_status(PaymentMethod::Cash),
            PaymentStatus::Pending
        );
        assert_eq!(
            initial_payment_status(PaymentMethod::Cod),
            PaymentStatus::Pending
        );
        assert_eq!(
            initial_payment_status(PaymentMethod::Card),
            PaymentStatus::Paid
        );
        assert_eq!(
            initial_payment_status(PaymentMethod::Upi),
            PaymentStatus::Paid
        );
        assert_eq!(
            initial_payment_status(PaymentMethod::Online),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        let rest = number.as_str().strip_prefix("ORD").unwrap();

        // 13-digit millisecond timestamp followed by the random suffix.
        assert_eq!(rest.len(), 13 + ORDER_SUFFIX_LEN, "unexpected shape: {number}");
        let (timestamp, suffix) = rest.split_at(13);
        assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }
}
