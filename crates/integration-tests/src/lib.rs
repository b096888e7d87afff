//! Integration tests for Vitrina.
//!
//! These tests exercise a running API server end-to-end over HTTP with
//! credentialed cookie sessions. They require:
//!
//! - A running `PostgreSQL` database with migrations applied
//!   (`vitrina-cli migrate`)
//! - The API server running (`cargo run -p vitrina-api`)
//! - For admin tests: an admin account created via
//!   `vitrina-cli admin create`, with `ADMIN_EMAIL`/`ADMIN_PASSWORD` set
//!
//! Run with: `cargo test -p vitrina-integration-tests -- --ignored`

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("VITRINA_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_owned())
}

/// Create an HTTP client with a cookie store (sessions ride on cookies).
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique email for this test run.
#[must_use]
pub fn unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4().simple())
}

/// Register a fresh customer and return its logged-in client and user JSON.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn register_customer() -> (Client, Value) {
    let client = client();
    let email = unique_email();

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": email,
            "password": "lozinka123",
            "firstName": "Test",
            "lastName": "Kupac",
            "phone": "0641234567",
            "acceptedTerms": true,
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), 201, "registration should succeed");
    let body: Value = resp.json().await.expect("Failed to read response");

    (client, body["user"].clone())
}

/// Log in as the admin account named by `ADMIN_EMAIL`/`ADMIN_PASSWORD`.
///
/// # Panics
///
/// Panics if the environment variables are missing or login fails.
pub async fn admin_client() -> Client {
    let email = std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set for admin tests");
    let password =
        std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set for admin tests");

    let client = client();
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in as admin");

    assert_eq!(resp.status(), 200, "admin login should succeed");
    client
}

/// Create a product via the admin API and return its JSON.
///
/// # Panics
///
/// Panics if creation fails.
pub async fn create_product(admin: &Client, price: i64, stock: Option<i32>) -> Value {
    let resp = admin
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "name": "Test proizvod",
            "brand": "TestBrand",
            "sku": format!("TST-{}", Uuid::new_v4().simple()),
            "price": price,
            "stock": stock,
        }))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), 201, "product creation should succeed");
    let body: Value = resp.json().await.expect("Failed to read response");
    body["product"].clone()
}

/// Add a product to the client's cart.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn add_to_cart(client: &Client, product_id: i64, quantity: i64) -> Value {
    let resp = client
        .post(format!("{}/api/cart/add", base_url()))
        .json(&json!({ "productId": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to add to cart");

    assert_eq!(resp.status(), 200, "add to cart should succeed");
    resp.json().await.expect("Failed to read response")
}

/// Valid checkout body for a customer, cash on delivery.
#[must_use]
pub fn checkout_body() -> Value {
    json!({
        "customer": {
            "firstName": "Test",
            "lastName": "Kupac",
            "email": "test@example.com",
            "phone": "+381641234567",
        },
        "shippingAddress": {
            "street": "Knez Mihailova 1",
            "city": "Beograd",
            "postalCode": "11000",
        },
        "paymentMethod": "cash",
    })
}
