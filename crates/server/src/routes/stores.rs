//! Store route handlers.
//!
//! Listing and detail are public; everything else requires authentication
//! and runs through the policy checks.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use retail_radar_core::StoreId;

use crate::db::StoreRepository;
use crate::db::stores::{StoreFields, StoreWithOwner};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::StoreResponse;
use crate::policy::{self, Action};
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Store create/update request body.
#[derive(Debug, Deserialize, Validate)]
pub struct StorePayload {
    #[validate(length(min = 2, message = "Store name must be at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[validate(length(min = 5, message = "Address must be at least 5 characters"))]
    pub address: String,
    #[validate(length(min = 2, message = "Locality must be at least 2 characters"))]
    pub locality: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 digits"))]
    pub phone: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

impl From<StorePayload> for StoreFields {
    fn from(payload: StorePayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            address: payload.address,
            locality: payload.locality,
            phone: payload.phone,
            email: payload.email,
        }
    }
}

/// Query parameters for the store listing.
#[derive(Debug, Deserialize)]
pub struct StoreListQuery {
    pub locality: Option<String>,
    pub search: Option<String>,
}

/// Response for the public store listing.
#[derive(Debug, Serialize)]
pub struct StoreListResponse {
    pub success: bool,
    pub stores: Vec<StoreResponse>,
}

/// Response for the caller's own stores.
#[derive(Debug, Serialize)]
pub struct MyStoresResponse {
    pub stores: Vec<StoreResponse>,
}

/// Response wrapping a single store.
#[derive(Debug, Serialize)]
pub struct StoreDetailResponse {
    pub store: StoreResponse,
}

/// Response for store create/update.
#[derive(Debug, Serialize)]
pub struct StoreMessageResponse {
    pub message: &'static str,
    pub store: StoreResponse,
}

/// Response for store deletion.
#[derive(Debug, Serialize)]
pub struct DeleteStoreResponse {
    pub message: &'static str,
}

fn to_response(row: StoreWithOwner) -> StoreResponse {
    StoreResponse::from_parts(row.store, row.owner)
}

// ============================================================================
// Handlers
// ============================================================================

/// List active stores, newest first.
///
/// GET /api/stores?locality=&search=
///
/// Both filters are case-insensitive substring matches; `search` covers
/// name and description.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<StoreListQuery>,
) -> Result<Json<StoreListResponse>> {
    let stores = StoreRepository::new(state.pool())
        .list_active(query.locality.as_deref(), query.search.as_deref())
        .await?;

    Ok(Json(StoreListResponse {
        success: true,
        stores: stores.into_iter().map(to_response).collect(),
    }))
}

/// List the caller's stores.
///
/// GET /api/stores/my
///
/// # Errors
///
/// 403 unless the caller is a store owner.
pub async fn my_stores(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MyStoresResponse>> {
    policy::authorize(&user, Action::ViewOwnStores)?;

    let stores = StoreRepository::new(state.pool())
        .list_by_owner(user.id)
        .await?;

    Ok(Json(MyStoresResponse {
        stores: stores.into_iter().map(to_response).collect(),
    }))
}

/// Fetch one store.
///
/// GET /api/stores/{id}
///
/// # Errors
///
/// 404 "Store not found" when the ID does not exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StoreDetailResponse>> {
    let store = StoreRepository::new(state.pool())
        .get_with_owner(StoreId::new(id))
        .await?
        .ok_or(AppError::NotFound("Store not found"))?;

    Ok(Json(StoreDetailResponse {
        store: to_response(store),
    }))
}

/// Create a store owned by the caller.
///
/// POST /api/stores
///
/// # Errors
///
/// 403 unless the caller is a store owner; 400 with `details` when the body
/// fails validation.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<StorePayload>,
) -> Result<(StatusCode, Json<StoreMessageResponse>)> {
    policy::authorize(&user, Action::CreateStore)?;
    payload.validate()?;

    let store = StoreRepository::new(state.pool())
        .create(user.id, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StoreMessageResponse {
            message: "Store created successfully",
            store: to_response(store),
        }),
    ))
}

/// Update a store.
///
/// PUT /api/stores/{id}
///
/// # Errors
///
/// 404 when the store does not exist, 403 when the caller does not own it,
/// 400 with `details` on validation failure.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Json(payload): Json<StorePayload>,
) -> Result<Json<StoreMessageResponse>> {
    let repo = StoreRepository::new(state.pool());
    let existing = repo
        .get_with_owner(StoreId::new(id))
        .await?
        .ok_or(AppError::NotFound("Store not found"))?;

    policy::authorize(
        &user,
        Action::UpdateStore {
            owner_id: existing.store.owner_id,
        },
    )?;
    payload.validate()?;

    let store = repo.update(StoreId::new(id), payload.into()).await?;

    Ok(Json(StoreMessageResponse {
        message: "Store updated successfully",
        store: to_response(store),
    }))
}

/// Delete a store and all of its products.
///
/// DELETE /api/stores/{id}
///
/// # Errors
///
/// 404 when the store does not exist, 403 when the caller does not own it.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<DeleteStoreResponse>> {
    let repo = StoreRepository::new(state.pool());
    let existing = repo
        .get_with_owner(StoreId::new(id))
        .await?
        .ok_or(AppError::NotFound("Store not found"))?;

    policy::authorize(
        &user,
        Action::DeleteStore {
            owner_id: existing.store.owner_id,
        },
    )?;

    repo.delete_with_products(StoreId::new(id)).await?;

    Ok(Json(DeleteStoreResponse {
        message: "Store and associated products deleted successfully",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_payload() -> StorePayload {
        StorePayload {
            name: "Campus Corner".to_string(),
            description: "Snacks and stationery by the main gate".to_string(),
            address: "12 College Road, North Campus".to_string(),
            locality: "North Campus".to_string(),
            phone: "5550001111".to_string(),
            email: "corner@example.com".to_string(),
        }
    }

    #[test]
    fn test_store_payload_accepts_valid_body() {
        assert!(valid_payload().validate().is_ok());
    }

    #[test]
    fn test_store_payload_field_messages() {
        let mut payload = valid_payload();
        payload.name = "X".to_string();
        payload.phone = "12345".to_string();

        let err = payload.validate().unwrap_err();
        let messages: Vec<String> = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .filter_map(|e| e.message.as_ref().map(ToString::to_string))
            .collect();

        assert!(messages.contains(&"Store name must be at least 2 characters".to_string()));
        assert!(messages.contains(&"Phone number must be at least 10 digits".to_string()));
    }

    #[test]
    fn test_store_payload_description_and_email() {
        let mut payload = valid_payload();
        payload.description = "too short".to_string();
        payload.email = "not-an-email".to_string();

        let err = payload.validate().unwrap_err();
        assert!(err.field_errors().contains_key("description"));
        assert!(err.field_errors().contains_key("email"));
    }
}
