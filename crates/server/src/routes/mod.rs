//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register       - Create an account
//! POST /api/auth/login          - Log in, sets the auth-token cookie
//! POST /api/auth/logout         - Clear the auth-token cookie
//!
//! # Stores
//! GET    /api/stores            - Active stores (?locality=&search=)
//! POST   /api/stores            - Create a store (store_owner)
//! GET    /api/stores/my         - Caller's stores (store_owner)
//! GET    /api/stores/{id}       - Store detail
//! PUT    /api/stores/{id}       - Update a store (owner)
//! DELETE /api/stores/{id}       - Delete a store and its products (owner)
//!
//! # Products
//! GET    /api/products          - Available products (?store=&category=&search=&page=&limit=)
//! POST   /api/products          - Create a product (store_owner owning storeId)
//! GET    /api/products/my       - Products across the caller's stores (store_owner)
//! GET    /api/products/{id}     - Product detail with store contact info
//! PUT    /api/products/{id}     - Update a product (owner)
//! DELETE /api/products/{id}     - Delete a product (owner)
//!
//! # Orders
//! GET   /api/orders             - Caller's orders, newest first (capped at 20)
//! POST  /api/orders             - Place an order
//! GET   /api/orders/{id}        - Order detail (customers: own orders only)
//! PATCH /api/orders/{id}/status - Update status fields (store_owner)
//! ```

pub mod auth;
pub mod orders;
pub mod products;
pub mod stores;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stores::index).post(stores::create))
        .route("/my", get(stores::my_stores))
        .route(
            "/{id}",
            get(stores::show).put(stores::update).delete(stores::destroy),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/my", get(products::my_products))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .nest("/auth", auth_routes())
            .nest("/stores", store_routes())
            .nest("/products", product_routes())
            .nest("/orders", order_routes()),
    )
}
