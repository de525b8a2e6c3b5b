//! Integration tests for product management and the public catalog.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p retail-radar-server)
//!
//! Run with: cargo test -p retail-radar-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use retail_radar_integration_tests::{TestUser, base_url};

// ============================================================================
// Access Control Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_customer_cannot_create_product() {
    let customer = TestUser::customer().await;

    let resp = customer
        .client
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": "Sneaky Product",
            "description": "A product a customer should not be able to list",
            "price": "10.00",
            "category": "Snacks",
            "stock": 5,
            "storeId": 1,
        }))
        .send()
        .await
        .expect("Failed to send product creation");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Only store owners can create products");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_create_requires_an_owned_store() {
    let owner = TestUser::store_owner().await;
    let other = TestUser::store_owner().await;
    let base_url = base_url();

    let store = owner.create_store("Protected Store").await;
    let store_id = store["id"].as_i64().expect("store id");

    let mut payload = json!({
        "name": "Orphan Product",
        "description": "Product created by an integration test",
        "price": "10.00",
        "category": "Snacks",
        "stock": 5,
        "storeId": store_id,
    });

    // Another owner pointing at my store gets the same 404 as no store at
    // all; the response doesn't reveal whether the store exists.
    let resp = other
        .client
        .post(format!("{base_url}/api/products"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send product creation");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Store not found or not authorized");

    payload["storeId"] = Value::Null;
    let resp = other
        .client
        .post(format!("{base_url}/api/products"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send product creation");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Store not found or not authorized");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cannot_touch_another_owners_product() {
    let owner = TestUser::store_owner().await;
    let intruder = TestUser::store_owner().await;
    let base_url = base_url();

    let store = owner.create_store("Owner Store").await;
    let product = owner
        .create_product(store["id"].as_i64().expect("store id"), "Kept Safe", "10.00", 5)
        .await;
    let product_id = product["id"].as_i64().expect("product id");

    let resp = intruder
        .client
        .put(format!("{base_url}/api/products/{product_id}"))
        .json(&json!({
            "name": "Hijacked",
            "description": "This update must never be accepted",
            "price": "1.00",
            "category": "Snacks",
            "stock": 0,
        }))
        .send()
        .await
        .expect("Failed to send product update");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Not authorized to update this product");

    let resp = intruder
        .client
        .delete(format!("{base_url}/api/products/{product_id}"))
        .send()
        .await
        .expect("Failed to send product deletion");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Not authorized to delete this product");
}

// ============================================================================
// CRUD Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_create_and_detail() {
    let owner = TestUser::store_owner().await;
    let base_url = base_url();

    let store = owner.create_store("Catalog Store").await;
    let store_id = store["id"].as_i64().expect("store id");

    let resp = owner
        .client
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "name": "Masala Chips",
            "description": "Crunchy chips with a masala dusting",
            "price": "24.50",
            "category": "Snacks",
            "stock": 120,
            "storeId": store_id,
        }))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Product created successfully");

    let product = &body["product"];
    assert_eq!(product["price"], "24.50");
    assert_eq!(product["stock"], 120);
    assert_eq!(product["isAvailable"], true);
    // No image was sent, so the key is absent rather than null.
    assert!(product.get("imageUrl").is_none());
    // Mutation responses embed the store without contact details.
    assert_eq!(product["store"]["id"], store_id);
    assert!(product["store"].get("phone").is_none());

    // The public detail view adds the store contact fields.
    let product_id = product["id"].as_i64().expect("product id");
    let resp = Client::new()
        .get(format!("{base_url}/api/products/{product_id}"))
        .send()
        .await
        .expect("Failed to fetch product detail");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["product"]["store"]["phone"], "9876543210");
    assert_eq!(body["product"]["store"]["email"], "store@example.com");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_update_and_delete() {
    let owner = TestUser::store_owner().await;
    let base_url = base_url();

    let store = owner.create_store("Churn Store").await;
    let product = owner
        .create_product(store["id"].as_i64().expect("store id"), "Old Name", "20.00", 10)
        .await;
    let product_id = product["id"].as_i64().expect("product id");

    let resp = owner
        .client
        .put(format!("{base_url}/api/products/{product_id}"))
        .json(&json!({
            "name": "New Name",
            "description": "Product created by an integration test",
            "price": "30.00",
            "category": "Snacks",
            "stock": 7,
        }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["product"]["name"], "New Name");
    assert_eq!(body["product"]["price"], "30.00");
    assert_eq!(body["product"]["stock"], 7);

    let resp = owner
        .client
        .delete(format!("{base_url}/api/products/{product_id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Product deleted successfully");

    let resp = Client::new()
        .get(format!("{base_url}/api/products/{product_id}"))
        .send()
        .await
        .expect("Failed to fetch deleted product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_validation_details() {
    let owner = TestUser::store_owner().await;
    let store = owner.create_store("Validation Store").await;

    let resp = owner
        .client
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": "Broken Product",
            "description": "Product created by an integration test",
            "price": "-5",
            "category": "Snacks",
            "stock": -1,
            "imageUrl": "not a url",
            "storeId": store["id"],
        }))
        .send()
        .await
        .expect("Failed to send product creation");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Validation failed");

    let messages: Vec<&str> = body["details"]
        .as_array()
        .expect("details is an array")
        .iter()
        .filter_map(|d| d["message"].as_str())
        .collect();
    assert!(messages.contains(&"Price must be a positive number"));
    assert!(messages.contains(&"Stock must be a positive number"));
    assert!(messages.contains(&"Invalid url"));
}

// ============================================================================
// Listing & Pagination Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_list_pagination() {
    let owner = TestUser::store_owner().await;
    let base_url = base_url();

    let store = owner.create_store("Pagination Store").await;
    let store_id = store["id"].as_i64().expect("store id");
    owner.create_product(store_id, "First", "10.00", 5).await;
    owner.create_product(store_id, "Second", "10.00", 5).await;
    let third = owner.create_product(store_id, "Third", "10.00", 5).await;

    // Page 1 of 2, newest first.
    let resp = Client::new()
        .get(format!("{base_url}/api/products"))
        .query(&[("store", store_id.to_string()), ("limit", "2".to_string())])
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);

    let products = body["products"].as_array().expect("products is an array");
    assert_eq!(products.len(), 2);
    assert_eq!(products.first().map(|p| &p["id"]), Some(&third["id"]));

    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["pages"], 2);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["hasNext"], true);
    assert_eq!(body["pagination"]["hasPrev"], false);

    // Page 2 holds the remaining product.
    let resp = Client::new()
        .get(format!("{base_url}/api/products"))
        .query(&[
            ("store", store_id.to_string()),
            ("limit", "2".to_string()),
            ("page", "2".to_string()),
        ])
        .send()
        .await
        .expect("Failed to list products");
    let body: Value = resp.json().await.expect("Failed to parse response");
    let products = body["products"].as_array().expect("products is an array");
    assert_eq!(products.len(), 1);
    assert_eq!(body["pagination"]["hasNext"], false);
    assert_eq!(body["pagination"]["hasPrev"], true);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_category_filter() {
    let owner = TestUser::store_owner().await;
    let base_url = base_url();

    let store = owner.create_store("Category Store").await;
    let store_id = store["id"].as_i64().expect("store id");

    // A category nobody else uses keeps the filter exact on a shared
    // database.
    let category = format!("cat-{}", Uuid::new_v4());
    let resp = owner
        .client
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "name": "Categorized Product",
            "description": "Product created by an integration test",
            "price": "12.00",
            "category": category.as_str(),
            "stock": 3,
            "storeId": store_id,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = Client::new()
        .get(format!("{base_url}/api/products"))
        .query(&[("category", category.as_str())])
        .send()
        .await
        .expect("Failed to list products by category");
    let body: Value = resp.json().await.expect("Failed to parse response");
    let products = body["products"].as_array().expect("products is an array");
    assert_eq!(products.len(), 1);
    assert_eq!(
        products.first().map(|p| &p["name"]),
        Some(&json!("Categorized Product"))
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_my_products_spans_all_stores() {
    let owner = TestUser::store_owner().await;
    let base_url = base_url();

    let first_store = owner.create_store("First Store").await;
    let second_store = owner.create_store("Second Store").await;
    let in_first = owner
        .create_product(first_store["id"].as_i64().expect("store id"), "In First", "10.00", 5)
        .await;
    let in_second = owner
        .create_product(second_store["id"].as_i64().expect("store id"), "In Second", "10.00", 5)
        .await;

    let resp = owner
        .client
        .get(format!("{base_url}/api/products/my"))
        .send()
        .await
        .expect("Failed to list own products");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    let products = body["products"].as_array().expect("products is an array");
    assert!(products.iter().any(|p| p["id"] == in_first["id"]));
    assert!(products.iter().any(|p| p["id"] == in_second["id"]));

    let customer = TestUser::customer().await;
    let resp = customer
        .client
        .get(format!("{base_url}/api/products/my"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Only store owners can access this endpoint");
}
