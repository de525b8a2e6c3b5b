//! Order route handlers.
//!
//! Placement goes through [`OrderService`] so stock reservation and the
//! response expansion stay in one place; reads and the status update talk to
//! the repository directly.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use retail_radar_core::{OrderId, OrderStatus, PaymentStatus};

use crate::db::orders::{OrderStatusUpdate, OrderWithDetails};
use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::OrderResponse;
use crate::policy::{self, Action};
use crate::services::orders::{OrderService, PlaceOrderInput};
use crate::state::AppState;

/// Most recent orders returned by the list endpoint.
const ORDER_LIST_LIMIT: i64 = 20;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Response for order placement.
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub message: &'static str,
    pub order: OrderResponse,
}

/// Body for the status update endpoint.
///
/// All fields are optional; omitted ones are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub estimated_delivery: Option<DateTime<Utc>>,
}

/// Response for the status update endpoint.
#[derive(Debug, Serialize)]
pub struct UpdateOrderStatusResponse {
    pub message: &'static str,
    pub order: OrderResponse,
}

fn to_response(details: OrderWithDetails) -> OrderResponse {
    let items = details.items.into_iter().map(Into::into).collect();
    OrderResponse::from_parts(details.order, details.customer, items)
}

// ============================================================================
// Handlers
// ============================================================================

/// List the caller's orders, newest first.
///
/// GET /api/orders
///
/// Returns a bare array capped at the 20 most recent orders.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderResponse>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_customer(user.id, ORDER_LIST_LIMIT)
        .await?;

    Ok(Json(orders.into_iter().map(to_response).collect()))
}

/// Place an order.
///
/// POST /api/orders
///
/// # Errors
///
/// 400 for a malformed request (missing items, incomplete address, bad
/// payment method, unknown product, insufficient stock) with the failure
/// named in the body.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<PlaceOrderInput>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>)> {
    let order = OrderService::new(state.pool())
        .place(user.id, input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            success: true,
            message: "Order placed successfully",
            order: to_response(order),
        }),
    ))
}

/// Fetch one order.
///
/// GET /api/orders/{id}
///
/// # Errors
///
/// 404 "Order not found" when the ID does not exist; 403 "Access denied"
/// when a customer opens someone else's order.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<OrderResponse>> {
    let details = OrderRepository::new(state.pool())
        .get_with_details(OrderId::new(id))
        .await?
        .ok_or(AppError::NotFound("Order not found"))?;

    policy::authorize(
        &user,
        Action::ViewOrder {
            customer_id: details.order.customer_id,
        },
    )?;

    Ok(Json(to_response(details)))
}

/// Update an order's status fields.
///
/// PATCH /api/orders/{id}/status
///
/// # Errors
///
/// 403 unless the caller is a store owner; 404 "Order not found" when the
/// ID does not exist.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<UpdateOrderStatusResponse>> {
    policy::authorize(&user, Action::UpdateOrderStatus)?;

    let repo = OrderRepository::new(state.pool());
    let id = OrderId::new(id);

    repo.update_status(
        id,
        OrderStatusUpdate {
            status: req.status,
            payment_status: req.payment_status,
            estimated_delivery: req.estimated_delivery,
        },
    )
    .await
    .map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound("Order not found"),
        other => AppError::Database(other),
    })?;

    let details = repo
        .get_with_details(id)
        .await?
        .ok_or(AppError::NotFound("Order not found"))?;

    Ok(Json(UpdateOrderStatusResponse {
        message: "Order updated successfully",
        order: to_response(details),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_update_body_parses_camel_case() {
        let req: UpdateOrderStatusRequest = serde_json::from_str(
            r#"{
                "status": "confirmed",
                "paymentStatus": "paid",
                "estimatedDelivery": "2026-08-26T12:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(req.status, Some(OrderStatus::Confirmed));
        assert_eq!(req.payment_status, Some(PaymentStatus::Paid));
        assert!(req.estimated_delivery.is_some());
    }

    #[test]
    fn test_status_update_body_allows_partial() {
        let req: UpdateOrderStatusRequest =
            serde_json::from_str(r#"{"status": "ready"}"#).unwrap();
        assert_eq!(req.status, Some(OrderStatus::Ready));
        assert_eq!(req.payment_status, None);
        assert_eq!(req.estimated_delivery, None);
    }

    #[test]
    fn test_status_update_body_rejects_unknown_status() {
        let result: std::result::Result<UpdateOrderStatusRequest, _> =
            serde_json::from_str(r#"{"status": "shipped"}"#);
        assert!(result.is_err());
    }
}
