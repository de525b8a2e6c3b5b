//! Integration tests for RetailRadar.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations
//! cargo run -p retail-radar-cli -- migrate
//!
//! # Start the API server
//! cargo run -p retail-radar-server
//!
//! # Run the (ignored) integration tests against it
//! cargo test -p retail-radar-integration-tests -- --ignored
//! ```
//!
//! Every test registers its own throwaway accounts with UUID emails and
//! creates its own stores and products, so the suite can run repeatedly
//! against the same database without a reset in between. Nothing is cleaned
//! up afterwards; `cargo run -p retail-radar-cli -- seed` restores a fresh
//! dataset when the clutter gets annoying.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Password shared by every throwaway account.
pub const PASSWORD: &str = "password123";

/// Base URL for the API server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("RETAILRADAR_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A registered, logged-in API account.
///
/// The client keeps the `auth-token` cookie from login, so every request
/// made through it is authenticated without touching the Authorization
/// header. Tests that exercise Bearer auth use [`TestUser::token`] with a
/// fresh client instead.
pub struct TestUser {
    pub client: Client,
    pub id: i64,
    pub email: String,
    pub token: String,
}

impl TestUser {
    /// Register and log in a fresh customer account.
    pub async fn customer() -> Self {
        Self::signup("customer").await
    }

    /// Register and log in a fresh store owner account.
    pub async fn store_owner() -> Self {
        Self::signup("store_owner").await
    }

    async fn signup(role: &str) -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");
        let base_url = base_url();
        let email = format!("integration-test-{}@example.com", Uuid::new_v4());

        let resp = client
            .post(format!("{base_url}/api/auth/register"))
            .json(&json!({
                "name": "Integration Test",
                "email": email,
                "password": PASSWORD,
                "role": role,
            }))
            .send()
            .await
            .expect("Failed to register");
        assert_eq!(
            resp.status(),
            StatusCode::CREATED,
            "registration failed for {email}"
        );
        let body: Value = resp.json().await.expect("Failed to parse register response");
        let id = body["user"]["id"].as_i64().expect("register returns the user id");

        let resp = client
            .post(format!("{base_url}/api/auth/login"))
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await
            .expect("Failed to log in");
        assert_eq!(resp.status(), StatusCode::OK, "login failed for {email}");
        let body: Value = resp.json().await.expect("Failed to parse login response");
        let token = body["token"]
            .as_str()
            .expect("login returns a token")
            .to_string();

        Self {
            client,
            id,
            email,
            token,
        }
    }

    /// Create a store and return its JSON representation.
    ///
    /// # Panics
    ///
    /// Panics unless the server accepts the store, so only call this from a
    /// store owner account.
    pub async fn create_store(&self, name: &str) -> Value {
        let base_url = base_url();
        let resp = self
            .client
            .post(format!("{base_url}/api/stores"))
            .json(&json!({
                "name": name,
                "description": "Campus store created by an integration test",
                "address": "12 College Road, Gate 2",
                "locality": "North Campus",
                "phone": "9876543210",
                "email": "store@example.com",
            }))
            .send()
            .await
            .expect("Failed to create store");
        assert_eq!(resp.status(), StatusCode::CREATED, "store creation failed");
        let body: Value = resp.json().await.expect("Failed to parse store response");
        body["store"].clone()
    }

    /// Create a product in one of the caller's stores and return its JSON
    /// representation.
    ///
    /// `price` is passed as a string ("24.50") the way browser clients send
    /// it.
    ///
    /// # Panics
    ///
    /// Panics unless the server accepts the product.
    pub async fn create_product(
        &self,
        store_id: i64,
        name: &str,
        price: &str,
        stock: i64,
    ) -> Value {
        let base_url = base_url();
        let resp = self
            .client
            .post(format!("{base_url}/api/products"))
            .json(&json!({
                "name": name,
                "description": "Product created by an integration test",
                "price": price,
                "category": "Snacks",
                "stock": stock,
                "storeId": store_id,
            }))
            .send()
            .await
            .expect("Failed to create product");
        assert_eq!(resp.status(), StatusCode::CREATED, "product creation failed");
        let body: Value = resp.json().await.expect("Failed to parse product response");
        body["product"].clone()
    }

    /// Fetch a product's current public state.
    ///
    /// # Panics
    ///
    /// Panics when the product does not exist.
    pub async fn get_product(&self, product_id: i64) -> Value {
        let base_url = base_url();
        let resp = self
            .client
            .get(format!("{base_url}/api/products/{product_id}"))
            .send()
            .await
            .expect("Failed to fetch product");
        assert_eq!(resp.status(), StatusCode::OK, "product {product_id} not found");
        let body: Value = resp.json().await.expect("Failed to parse product response");
        body["product"].clone()
    }

    /// Place a single-line order.
    ///
    /// Returns the raw response so callers can assert on rejections too.
    ///
    /// # Panics
    ///
    /// Panics only when the request cannot be sent at all.
    pub async fn place_order(
        &self,
        product_id: i64,
        quantity: i64,
        payment_method: &str,
    ) -> reqwest::Response {
        let base_url = base_url();
        self.client
            .post(format!("{base_url}/api/orders"))
            .json(&json!({
                "items": [{ "productId": product_id, "quantity": quantity }],
                "deliveryAddress": { "phone": "5550001111", "address": "Hostel B, Room 214" },
                "paymentMethod": payment_method,
            }))
            .send()
            .await
            .expect("Failed to send order request")
    }
}
