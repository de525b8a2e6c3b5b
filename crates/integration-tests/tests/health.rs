//! Liveness and readiness probes.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p retail-radar-server)
//!
//! Run with: cargo test -p retail-radar-integration-tests -- --ignored

use reqwest::StatusCode;

use retail_radar_integration_tests::base_url;

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health_returns_ok() {
    let resp = reqwest::get(format!("{}/health", base_url()))
        .await
        .expect("Failed to reach /health");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_readiness_checks_the_database() {
    let resp = reqwest::get(format!("{}/health/ready", base_url()))
        .await
        .expect("Failed to reach /health/ready");

    assert_eq!(resp.status(), StatusCode::OK);
}
