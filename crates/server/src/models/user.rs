//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use retail_radar_core::{Email, Role, UserId};

/// A marketplace user (domain type).
///
/// The password hash stays behind in the `app_user` row and never appears
/// here, so user objects can be serialized into responses without leaking
/// credentials.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Account role (customer or store owner).
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The authenticated identity attached to a request.
///
/// Decoded from the bearer token by the auth extractor; carries exactly the
/// claims the token was issued with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Authenticated user's ID.
    pub id: UserId,
    /// Email at the time the token was issued.
    pub email: Email,
    /// Role at the time the token was issued.
    pub role: Role,
}

/// Wire format for a full user object (no credentials).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Abbreviated user object used when expanding owner/customer references.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_omits_credentials() {
        let user = User {
            id: UserId::new(1),
            name: "Jane".to_string(),
            email: Email::parse("jane@example.com").unwrap(),
            role: Role::Customer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["role"], "customer");
        assert_eq!(json["email"], "jane@example.com");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        // camelCase wire names
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
