//! Domain models and wire-format types for the marketplace API.
//!
//! Domain types (`User`, `Store`, `Product`, `Order`) are validated objects
//! separate from database row types. The `*Response` types define the JSON
//! wire format (camelCase field names) returned to clients.

pub mod order;
pub mod product;
pub mod store;
pub mod user;

pub use order::{
    DeliveryAddress, Order, OrderItem, OrderItemProductSummary, OrderItemResponse, OrderResponse,
};
pub use product::{Product, ProductResponse, ProductStoreSummary};
pub use store::{Store, StoreResponse};
pub use user::{CurrentUser, User, UserResponse, UserSummary};
