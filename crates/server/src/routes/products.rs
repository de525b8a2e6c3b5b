//! Product route handlers.
//!
//! The public listing is paginated and filterable; the detail endpoint adds
//! the store's contact fields to the embedded store summary. Mutations
//! resolve the product's store owner and run through the policy checks.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use retail_radar_core::{ProductId, StoreId};

use crate::db::products::{ProductFields, ProductListFilter, ProductWithStore};
use crate::db::{ProductRepository, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::ProductResponse;
use crate::policy::{self, Action};
use crate::state::AppState;

/// Products returned per page when the query does not say otherwise.
const DEFAULT_PAGE_SIZE: i64 = 50;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Product create/update request body.
///
/// `store_id` is only honored on create; updates cannot move a product to
/// another store.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 2, message = "Product name must be at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[validate(custom = "validate_price")]
    pub price: Decimal,
    #[validate(length(min = 2, message = "Category must be at least 2 characters"))]
    pub category: String,
    #[validate(range(min = 0, message = "Stock must be a positive number"))]
    pub stock: i32,
    #[validate(custom = "validate_image_url")]
    pub image_url: Option<String>,
    pub store_id: Option<i32>,
}

impl From<ProductPayload> for ProductFields {
    fn from(payload: ProductPayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            category: payload.category,
            price: payload.price,
            stock: payload.stock,
            // An empty string means "no image", same as leaving it out
            image_url: payload.image_url.filter(|url| !url.is_empty()),
        }
    }
}

fn validate_price(price: &Decimal) -> std::result::Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Price must be a positive number".into());
        return Err(err);
    }
    Ok(())
}

fn validate_image_url(url: &str) -> std::result::Result<(), ValidationError> {
    if url.is_empty() || validator::validate_url(url) {
        return Ok(());
    }
    let mut err = ValidationError::new("url");
    err.message = Some("Invalid url".into());
    Err(err)
}

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub store: Option<i32>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Pagination block for the product listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    fn new(total: i64, page: i64, limit: i64) -> Self {
        // `i64::div_ceil` is unstable (int_roundings); this is its exact
        // stable equivalent, rounding toward positive infinity.
        let pages = {
            let (d, r) = (total / limit, total % limit);
            if (r > 0 && limit > 0) || (r < 0 && limit < 0) {
                d + 1
            } else {
                d
            }
        };
        Self {
            total,
            pages,
            current_page: page,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

/// Response for the public product listing.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<ProductResponse>,
    pub pagination: Pagination,
}

/// Response for the caller's own products.
#[derive(Debug, Serialize)]
pub struct MyProductsResponse {
    pub products: Vec<ProductResponse>,
}

/// Response wrapping a single product.
#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub product: ProductResponse,
}

/// Response for product create/update.
#[derive(Debug, Serialize)]
pub struct ProductMessageResponse {
    pub message: &'static str,
    pub product: ProductResponse,
}

/// Response for product deletion.
#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub message: &'static str,
}

/// List/mutation responses carry the store without contact fields.
fn to_list_response(row: ProductWithStore) -> ProductResponse {
    ProductResponse::from_parts(row.product, row.store.without_contact())
}

/// The detail response keeps the store's phone and email.
fn to_detail_response(row: ProductWithStore) -> ProductResponse {
    ProductResponse::from_parts(row.product, row.store)
}

// ============================================================================
// Handlers
// ============================================================================

/// List available products, newest first, paginated.
///
/// GET /api/products?store=&category=&search=&page=&limit=
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let offset = (page - 1) * limit;

    let filter = ProductListFilter {
        store: query.store.map(StoreId::new),
        category: query.category,
        search: query.search,
    };

    let (products, total) = ProductRepository::new(state.pool())
        .list_available(&filter, limit, offset)
        .await?;

    Ok(Json(ProductListResponse {
        success: true,
        products: products.into_iter().map(to_list_response).collect(),
        pagination: Pagination::new(total, page, limit),
    }))
}

/// List products across all of the caller's stores.
///
/// GET /api/products/my
///
/// # Errors
///
/// 403 unless the caller is a store owner.
pub async fn my_products(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MyProductsResponse>> {
    policy::authorize(&user, Action::ViewOwnProducts)?;

    let products = ProductRepository::new(state.pool())
        .list_by_owner(user.id)
        .await?;

    Ok(Json(MyProductsResponse {
        products: products.into_iter().map(to_list_response).collect(),
    }))
}

/// Fetch one product with its store's contact details.
///
/// GET /api/products/{id}
///
/// # Errors
///
/// 404 "Product not found" when the ID does not exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDetailResponse>> {
    let product = ProductRepository::new(state.pool())
        .get_with_store(ProductId::new(id))
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;

    Ok(Json(ProductDetailResponse {
        product: to_detail_response(product),
    }))
}

/// Create a product in one of the caller's stores.
///
/// POST /api/products
///
/// # Errors
///
/// 403 unless the caller is a store owner; 404 when `storeId` is missing,
/// unknown, or owned by someone else; 400 with `details` on validation
/// failure.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<ProductMessageResponse>)> {
    policy::authorize(&user, Action::CreateProduct)?;

    // A missing storeId and a store the caller doesn't own are
    // indistinguishable to the client.
    let store_id = payload
        .store_id
        .ok_or(AppError::NotFound("Store not found or not authorized"))?;
    StoreRepository::new(state.pool())
        .get_owned(StoreId::new(store_id), user.id)
        .await?
        .ok_or(AppError::NotFound("Store not found or not authorized"))?;

    payload.validate()?;

    let product = ProductRepository::new(state.pool())
        .create(StoreId::new(store_id), payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductMessageResponse {
            message: "Product created successfully",
            product: to_list_response(product),
        }),
    ))
}

/// Update a product.
///
/// PUT /api/products/{id}
///
/// # Errors
///
/// 404 when the product does not exist, 403 when the caller does not own
/// its store, 400 with `details` on validation failure.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<ProductMessageResponse>> {
    let repo = ProductRepository::new(state.pool());
    let existing = repo
        .get_with_store(ProductId::new(id))
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;

    policy::authorize(
        &user,
        Action::UpdateProduct {
            owner_id: existing.store_owner_id,
        },
    )?;
    payload.validate()?;

    let product = repo.update(ProductId::new(id), payload.into()).await?;

    Ok(Json(ProductMessageResponse {
        message: "Product updated successfully",
        product: to_list_response(product),
    }))
}

/// Delete a product.
///
/// DELETE /api/products/{id}
///
/// # Errors
///
/// 404 when the product does not exist, 403 when the caller does not own
/// its store.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<DeleteProductResponse>> {
    let repo = ProductRepository::new(state.pool());
    let existing = repo
        .get_with_store(ProductId::new(id))
        .await?
        .ok_or(AppError::NotFound("Product not found"))?;

    policy::authorize(
        &user,
        Action::DeleteProduct {
            owner_id: existing.store_owner_id,
        },
    )?;

    repo.delete(ProductId::new(id)).await?;

    Ok(Json(DeleteProductResponse {
        message: "Product deleted successfully",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn valid_payload() -> ProductPayload {
        ProductPayload {
            name: "Instant Noodles".to_string(),
            description: "Late-night classic, serves one".to_string(),
            price: Decimal::from_str("24.50").unwrap(),
            category: "Snacks".to_string(),
            stock: 120,
            image_url: None,
            store_id: Some(7),
        }
    }

    #[test]
    fn test_product_payload_parses_camel_case() {
        let payload: ProductPayload = serde_json::from_str(
            r#"{
                "name": "Instant Noodles",
                "description": "Late-night classic, serves one",
                "price": 24.50,
                "category": "Snacks",
                "stock": 120,
                "imageUrl": "https://example.com/noodles.jpg",
                "storeId": 7
            }"#,
        )
        .unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(payload.price, Decimal::from_str("24.50").unwrap());
        assert_eq!(payload.store_id, Some(7));
    }

    #[test]
    fn test_product_payload_rejects_negative_price_and_stock() {
        let mut payload = valid_payload();
        payload.price = Decimal::from_str("-1").unwrap();
        payload.stock = -3;

        let err = payload.validate().unwrap_err();
        let messages: Vec<String> = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .filter_map(|e| e.message.as_ref().map(ToString::to_string))
            .collect();

        assert!(messages.contains(&"Price must be a positive number".to_string()));
        assert!(messages.contains(&"Stock must be a positive number".to_string()));
    }

    #[test]
    fn test_image_url_allows_empty_and_rejects_garbage() {
        let mut payload = valid_payload();
        payload.image_url = Some(String::new());
        assert!(payload.validate().is_ok());

        payload.image_url = Some("not a url".to_string());
        assert!(payload.validate().is_err());

        payload.image_url = Some("https://example.com/p.jpg".to_string());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_empty_image_url_normalizes_to_none() {
        let mut payload = valid_payload();
        payload.image_url = Some(String::new());
        let fields: ProductFields = payload.into();
        assert_eq!(fields.image_url, None);
    }

    #[test]
    fn test_pagination_math() {
        let p = Pagination::new(120, 1, 50);
        assert_eq!(p.pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);

        let p = Pagination::new(120, 3, 50);
        assert!(!p.has_next);
        assert!(p.has_prev);

        let p = Pagination::new(0, 1, 50);
        assert_eq!(p.pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }
}
