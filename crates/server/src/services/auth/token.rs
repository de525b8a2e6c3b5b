//! Auth token signing and verification.
//!
//! Tokens are HS256-signed JWTs carrying the user's ID, email, and role.
//! The lifetime matches the `auth-token` cookie, so a browser session and a
//! bearer-header client expire together.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use retail_radar_core::{Email, Role, UserId};

use super::AuthError;
use crate::models::user::{CurrentUser, User};

/// Token lifetime in days.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried by an auth token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i32,
    /// Email at issue time.
    pub email: String,
    /// Role at issue time.
    pub role: Role,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Signs and verifies auth tokens with the configured secret.
///
/// Built once at startup and shared through application state; both keys are
/// derived from the same HS256 secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    /// Create a signer from the configured secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a signed token for the given user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.as_i32(),
            email: user.email.as_str().to_owned(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::TokenCreation)
    }

    /// Verify a token and return the identity it carries.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` on a bad signature, expired token,
    /// or claims that fail to parse.
    pub fn verify(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| AuthError::InvalidToken)?;

        let email = Email::parse(&data.claims.email).map_err(|_| AuthError::InvalidToken)?;

        Ok(CurrentUser {
            id: UserId::new(data.claims.sub),
            email,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn signer(secret: &str) -> TokenSigner {
        TokenSigner::new(&SecretString::from(secret.to_owned()))
    }

    fn sample_user() -> User {
        User {
            id: UserId::new(9),
            name: "Jane".to_string(),
            email: Email::parse("jane@example.com").unwrap(),
            role: Role::StoreOwner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let signer = signer("roundtrip-secret-roundtrip-secret");
        let token = signer.issue(&sample_user()).unwrap();

        let current = signer.verify(&token).unwrap();
        assert_eq!(current.id, UserId::new(9));
        assert_eq!(current.email.as_str(), "jane@example.com");
        assert_eq!(current.role, Role::StoreOwner);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = signer("first-secret-first-secret-first!")
            .issue(&sample_user())
            .unwrap();

        let err = signer("other-secret-other-secret-other!")
            .verify(&token)
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let signer = signer("roundtrip-secret-roundtrip-secret");
        assert!(matches!(
            signer.verify("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(signer.verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_carries_seven_day_expiry() {
        let signer = signer("roundtrip-secret-roundtrip-secret");
        let token = signer.issue(&sample_user()).unwrap();

        // Decode without verifying to inspect the raw claims.
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        let data = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"ignored"),
            &validation,
        )
        .unwrap();

        let lifetime = data.claims.exp - data.claims.iat;
        assert_eq!(lifetime, TOKEN_TTL_DAYS * 24 * 60 * 60);
    }
}
