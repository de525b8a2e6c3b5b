//! Store domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use retail_radar_core::{StoreId, UserId};

use super::user::UserSummary;

/// A storefront owned by a store-owner account (domain type).
#[derive(Debug, Clone)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Store display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Street address.
    pub address: String,
    /// Neighbourhood or campus area used for filtering.
    pub locality: String,
    /// Contact phone number.
    pub phone: String,
    /// Contact email address (not required to match the owner's login email).
    pub email: String,
    /// ID of the owning user.
    pub owner_id: UserId,
    /// Whether the store is visible in public listings.
    pub is_active: bool,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Wire format for a store with its owner expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    pub id: StoreId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub locality: String,
    pub phone: String,
    pub email: String,
    pub owner: UserSummary,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoreResponse {
    /// Combines a store with its owner summary for the wire.
    #[must_use]
    pub fn from_parts(store: Store, owner: UserSummary) -> Self {
        Self {
            id: store.id,
            name: store.name,
            description: store.description,
            address: store.address,
            locality: store.locality,
            phone: store.phone,
            email: store.email,
            owner,
            is_active: store.is_active,
            created_at: store.created_at,
            updated_at: store.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use retail_radar_core::Email;

    #[test]
    fn test_store_response_embeds_owner() {
        let store = Store {
            id: StoreId::new(7),
            name: "Campus Corner".to_string(),
            description: "Snacks and stationery".to_string(),
            address: "12 College Road".to_string(),
            locality: "North Campus".to_string(),
            phone: "5550001111".to_string(),
            email: "corner@example.com".to_string(),
            owner_id: UserId::new(3),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let owner = UserSummary {
            id: UserId::new(3),
            name: "Sam".to_string(),
            email: Email::parse("sam@example.com").unwrap(),
        };

        let json = serde_json::to_value(StoreResponse::from_parts(store, owner)).unwrap();
        assert_eq!(json["owner"]["id"], 3);
        assert_eq!(json["owner"]["email"], "sam@example.com");
        assert_eq!(json["isActive"], true);
        assert!(json.get("ownerId").is_none());
    }
}
