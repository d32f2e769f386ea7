//! Integration tests for Animart.
//!
//! The tests in `tests/` drive the real HTTP APIs of both binaries and
//! are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, then:
//! cargo run -p animart-cli -- migrate
//! cargo run -p animart-cli -- seed
//! cargo run -p animart-cli -- admin create -e admin@animart.test -p 'integration-pass'
//!
//! # Start both servers:
//! cargo run -p animart-storefront &
//! cargo run -p animart-admin &
//!
//! # Run the ignored tests:
//! cargo test -p animart-integration-tests -- --ignored
//! ```

use reqwest::Client;
use serde_json::Value;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_TEST_URL").unwrap_or_else(|_| "http://localhost:3001".to_owned())
}

/// Admin credentials for test sign-in (see the setup instructions above).
#[must_use]
pub fn admin_credentials() -> (String, String) {
    let email =
        std::env::var("ADMIN_TEST_EMAIL").unwrap_or_else(|_| "admin@animart.test".to_owned());
    let password =
        std::env::var("ADMIN_TEST_PASSWORD").unwrap_or_else(|_| "integration-pass".to_owned());
    (email, password)
}

/// A cookie-holding HTTP client; each client is an independent visitor.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Sign a client in to the admin API.
///
/// # Panics
///
/// Panics if the sign-in request fails or is rejected.
pub async fn admin_sign_in(client: &Client) {
    let (email, password) = admin_credentials();
    let resp = client
        .post(format!("{}/api/auth/login", admin_base_url()))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send admin login");
    assert!(
        resp.status().is_success(),
        "admin login failed: {}",
        resp.status()
    );
}

/// Register a throwaway customer and leave the client signed in.
/// Returns the generated email address.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn register_customer(client: &Client) -> String {
    let email = format!("shopper-{}@animart.test", uuid::Uuid::new_v4().simple());
    let resp = client
        .post(format!("{}/api/auth/register", storefront_base_url()))
        .json(&serde_json::json!({
            "email": email,
            "password": "correct horse battery",
            "firstName": "Integration",
            "lastName": "Shopper",
        }))
        .send()
        .await
        .expect("Failed to send registration");
    assert_eq!(resp.status(), 201, "registration failed");
    email
}

/// Extract a JSON body, panicking with the payload on failure.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
pub async fn json_body(resp: reqwest::Response) -> Value {
    let status = resp.status();
    let text = resp.text().await.expect("Failed to read response body");
    serde_json::from_str(&text)
        .unwrap_or_else(|_| panic!("non-JSON response (status {status}): {text}"))
}
