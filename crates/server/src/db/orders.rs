//! Order repository: transactional placement plus the read paths.
//!
//! Placement runs inside a single transaction. Stock is taken with a
//! conditional `UPDATE ... WHERE stock >= quantity`, so two concurrent orders
//! for the same product cannot both succeed past the available stock, and a
//! failure on any line rolls back the decrements already applied for earlier
//! lines.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use retail_radar_core::{
    Email, OrderId, OrderItemId, OrderNumber, OrderStatus, PaymentMethod, PaymentStatus,
    ProductId, UserId,
};

use super::RepositoryError;
use crate::models::order::{
    DeliveryAddress, Order, OrderItem, OrderItemProductSummary, OrderItemResponse,
};
use crate::models::user::UserSummary;

/// Raw `customer_order` row joined with the customer's name and email.
#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderWithCustomerRow {
    id: i32,
    order_number: OrderNumber,
    customer_id: i32,
    total_amount: Decimal,
    status: String,
    payment_status: String,
    payment_method: String,
    delivery_address: serde_json::Value,
    notes: Option<String>,
    estimated_delivery: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    customer_name: String,
    customer_email: String,
}

/// Raw `order_item` row left-joined with its product's display fields.
#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: Option<i32>,
    quantity: i32,
    price: Decimal,
    position: i32,
    product_name: Option<String>,
    product_image_url: Option<String>,
}

/// An order line paired with its product summary, if the product still exists.
#[derive(Debug, Clone)]
pub struct OrderItemWithProduct {
    pub item: OrderItem,
    pub product: Option<OrderItemProductSummary>,
}

impl From<OrderItemRow> for OrderItemWithProduct {
    fn from(row: OrderItemRow) -> Self {
        let product = match (row.product_id, row.product_name) {
            (Some(id), Some(name)) => Some(OrderItemProductSummary {
                id: ProductId::new(id),
                name,
                image_url: row.product_image_url,
            }),
            _ => None,
        };

        Self {
            item: OrderItem {
                id: OrderItemId::new(row.id),
                order_id: OrderId::new(row.order_id),
                product_id: row.product_id.map(ProductId::new),
                quantity: row.quantity,
                price: row.price,
                position: row.position,
            },
            product,
        }
    }
}

impl From<OrderItemWithProduct> for OrderItemResponse {
    fn from(line: OrderItemWithProduct) -> Self {
        Self {
            product: line.product,
            quantity: line.item.quantity,
            price: line.item.price,
        }
    }
}

/// An order with its customer and lines fully expanded.
#[derive(Debug, Clone)]
pub struct OrderWithDetails {
    pub order: Order,
    pub customer: UserSummary,
    pub items: Vec<OrderItemWithProduct>,
}

fn parse_order_row(row: OrderWithCustomerRow) -> Result<(Order, UserSummary), RepositoryError> {
    let status = row
        .status
        .parse::<OrderStatus>()
        .map_err(RepositoryError::DataCorruption)?;
    let payment_status = row
        .payment_status
        .parse::<PaymentStatus>()
        .map_err(RepositoryError::DataCorruption)?;
    let payment_method = row
        .payment_method
        .parse::<PaymentMethod>()
        .map_err(RepositoryError::DataCorruption)?;
    let delivery_address: DeliveryAddress =
        serde_json::from_value(row.delivery_address).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid delivery address in database: {e}"))
        })?;
    let customer_email = Email::parse(&row.customer_email).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid customer email in database: {e}"))
    })?;

    let order = Order {
        id: OrderId::new(row.id),
        order_number: row.order_number,
        customer_id: UserId::new(row.customer_id),
        total_amount: row.total_amount,
        status,
        payment_status,
        payment_method,
        delivery_address,
        notes: row.notes,
        estimated_delivery: row.estimated_delivery,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    let customer = UserSummary {
        id: order.customer_id,
        name: row.customer_name,
        email: customer_email,
    };

    Ok((order, customer))
}

/// One requested order line, already validated by the service layer.
#[derive(Debug, Clone, Copy)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Parameters for placing an order.
#[derive(Debug)]
pub struct PlaceOrder {
    pub order_number: OrderNumber,
    pub customer_id: UserId,
    pub items: Vec<OrderLine>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_address: DeliveryAddress,
    pub notes: Option<String>,
}

/// Changes accepted by the order status update.
///
/// `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct OrderStatusUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub estimated_delivery: Option<DateTime<Utc>>,
}

/// Failures specific to order placement.
#[derive(Debug, thiserror::Error)]
pub enum OrderPlacementError {
    /// A requested product does not exist.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// A requested quantity exceeds the product's current stock.
    #[error("Insufficient stock for {0}")]
    InsufficientStock(String),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderPlacementError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

const ORDER_WITH_CUSTOMER_COLUMNS: &str = r"
    o.id, o.order_number, o.customer_id, o.total_amount, o.status,
    o.payment_status, o.payment_method, o.delivery_address, o.notes,
    o.estimated_delivery, o.created_at, o.updated_at,
    u.name AS customer_name, u.email AS customer_email
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order: decrement stock for every line, capture unit prices,
    /// compute the total, and persist the order with its lines.
    ///
    /// Everything runs in one transaction. Any line failure rolls the whole
    /// placement back, including stock decrements applied for earlier lines.
    ///
    /// # Errors
    ///
    /// Returns `OrderPlacementError::ProductNotFound` if a line references a
    /// product that does not exist, `OrderPlacementError::InsufficientStock`
    /// if a line's quantity exceeds the product's stock, and
    /// `OrderPlacementError::Repository` for database failures (including an
    /// order number collision, surfaced as a conflict).
    #[instrument(skip(self, params), fields(customer_id = params.customer_id.as_i32(), lines = params.items.len()))]
    pub async fn place(&self, params: PlaceOrder) -> Result<OrderId, OrderPlacementError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::Database)?;

        let mut total = Decimal::ZERO;
        let mut captured: Vec<(ProductId, i32, Decimal)> = Vec::with_capacity(params.items.len());

        for line in &params.items {
            let decremented: Option<(String, Decimal)> = sqlx::query_as(
                r"
                UPDATE product
                SET stock = stock - $2, updated_at = now()
                WHERE id = $1 AND stock >= $2
                RETURNING name, price
                ",
            )
            .bind(line.product_id.as_i32())
            .bind(line.quantity)
            .fetch_optional(&mut *tx)
            .await?;

            let Some((_, price)) = decremented else {
                // Tell a missing product apart from an out-of-stock one.
                let existing: Option<(String,)> =
                    sqlx::query_as("SELECT name FROM product WHERE id = $1")
                        .bind(line.product_id.as_i32())
                        .fetch_optional(&mut *tx)
                        .await?;

                return Err(match existing {
                    Some((name,)) => OrderPlacementError::InsufficientStock(name),
                    None => OrderPlacementError::ProductNotFound(line.product_id),
                });
            };

            total += price * Decimal::from(line.quantity);
            captured.push((line.product_id, line.quantity, price));
        }

        let (order_id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO customer_order
                (order_number, customer_id, total_amount, status, payment_status,
                 payment_method, delivery_address, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(&params.order_number)
        .bind(params.customer_id.as_i32())
        .bind(total)
        .bind(OrderStatus::Pending.as_str())
        .bind(params.payment_status.as_str())
        .bind(params.payment_method.as_str())
        .bind(sqlx::types::Json(&params.delivery_address))
        .bind(params.notes.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order number collision".to_owned()).into();
            }
            OrderPlacementError::from(e)
        })?;

        for (position, (product_id, quantity, price)) in (0i32..).zip(captured) {
            sqlx::query(
                r"
                INSERT INTO order_item (order_id, product_id, quantity, price, position)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(order_id)
            .bind(product_id.as_i32())
            .bind(quantity)
            .bind(price)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await.map_err(RepositoryError::Database)?;

        debug!(order_id, %total, "Placed order");
        Ok(OrderId::new(order_id))
    }

    /// List a customer's own orders, newest first, capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored enum or address
    /// data cannot be parsed.
    pub async fn list_for_customer(
        &self,
        customer_id: UserId,
        limit: i64,
    ) -> Result<Vec<OrderWithDetails>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderWithCustomerRow>(&format!(
            r"
            SELECT {ORDER_WITH_CUSTOMER_COLUMNS}
            FROM customer_order o
            JOIN app_user u ON u.id = o.customer_id
            WHERE o.customer_id = $1
            ORDER BY o.created_at DESC, o.id DESC
            LIMIT $2
            ",
        ))
        .bind(customer_id.as_i32())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let orders = rows
            .into_iter()
            .map(parse_order_row)
            .collect::<Result<Vec<_>, _>>()?;

        let order_ids: Vec<i32> = orders.iter().map(|(o, _)| o.id.as_i32()).collect();
        let mut items_by_order = self.items_for_orders(&order_ids).await?;

        Ok(orders
            .into_iter()
            .map(|(order, customer)| {
                let items = items_by_order.remove(&order.id.as_i32()).unwrap_or_default();
                OrderWithDetails {
                    order,
                    customer,
                    items,
                }
            })
            .collect())
    }

    /// Get an order by ID with its customer and lines expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored enum or address
    /// data cannot be parsed.
    pub async fn get_with_details(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithDetails>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderWithCustomerRow>(&format!(
            r"
            SELECT {ORDER_WITH_CUSTOMER_COLUMNS}
            FROM customer_order o
            JOIN app_user u ON u.id = o.customer_id
            WHERE o.id = $1
            ",
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let (order, customer) = parse_order_row(row)?;
        let mut items_by_order = self.items_for_orders(&[order.id.as_i32()]).await?;
        let items = items_by_order.remove(&order.id.as_i32()).unwrap_or_default();

        Ok(Some(OrderWithDetails {
            order,
            customer,
            items,
        }))
    }

    /// Apply a partial status update to an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, id, changes), fields(order_id = id.as_i32(), changes = ?changes))]
    pub async fn update_status(
        &self,
        id: OrderId,
        changes: OrderStatusUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer_order
            SET status = COALESCE($2, status),
                payment_status = COALESCE($3, payment_status),
                estimated_delivery = COALESCE($4, estimated_delivery),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .bind(changes.status.map(OrderStatus::as_str))
        .bind(changes.payment_status.map(PaymentStatus::as_str))
        .bind(changes.estimated_delivery)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Fetch the lines for a set of orders in one query, grouped by order.
    async fn items_for_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<OrderItemWithProduct>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT i.id, i.order_id, i.product_id, i.quantity, i.price, i.position,
                   p.name AS product_name, p.image_url AS product_image_url
            FROM order_item i
            LEFT JOIN product p ON p.id = i.product_id
            WHERE i.order_id = ANY($1)
            ORDER BY i.order_id, i.position
            ",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<OrderItemWithProduct>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.order_id)
                .or_default()
                .push(OrderItemWithProduct::from(row));
        }
        Ok(grouped)
    }
}
