//! Integration tests for registration, login, and session handling.
//!
//! Requires a running server and migrated database (see crate docs). Run
//! with `cargo test -- --ignored`.

use serde_json::{Value, json};
use vitrina_integration_tests::{base_url, client, register_customer, unique_email};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_logs_the_user_in() {
    let (customer, user) = register_customer().await;

    assert_eq!(user["role"].as_str(), Some("customer"));

    let resp = customer
        .get(format!("{}/api/auth/check-auth", base_url()))
        .send()
        .await
        .expect("check-auth");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["authenticated"].as_bool(), Some(true));
    assert_eq!(body["user"]["email"], user["email"]);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_rejects_duplicate_email() {
    let client_one = client();
    let email = unique_email();

    let body = json!({
        "email": email,
        "password": "lozinka123",
        "firstName": "Test",
        "lastName": "Kupac",
        "phone": "0641234567",
        "acceptedTerms": true,
    });

    let first = client_one
        .post(format!("{}/api/auth/register", base_url()))
        .json(&body)
        .send()
        .await
        .expect("first register");
    assert_eq!(first.status(), 201);

    let second = client()
        .post(format!("{}/api/auth/register", base_url()))
        .json(&body)
        .send()
        .await
        .expect("second register");
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_requires_terms_and_valid_phone() {
    let body = |phone: &str, terms: bool| {
        json!({
            "email": unique_email(),
            "password": "lozinka123",
            "firstName": "Test",
            "lastName": "Kupac",
            "phone": phone,
            "acceptedTerms": terms,
        })
    };

    let no_terms = client()
        .post(format!("{}/api/auth/register", base_url()))
        .json(&body("0641234567", false))
        .send()
        .await
        .expect("register");
    assert_eq!(no_terms.status(), 400);

    let bad_phone = client()
        .post(format!("{}/api/auth/register", base_url()))
        .json(&body("064 123", true))
        .send()
        .await
        .expect("register");
    assert_eq!(bad_phone.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_with_wrong_password() {
    let (_, user) = register_customer().await;
    let email = user["email"].as_str().expect("email");

    let resp = client()
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "pogresna123" }))
        .send()
        .await
        .expect("login");

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"].as_str(), Some("Pogrešan email ili lozinka"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_logout_invalidates_session() {
    let (customer, _) = register_customer().await;

    let logout = customer
        .post(format!("{}/api/auth/logout", base_url()))
        .send()
        .await
        .expect("logout");
    assert_eq!(logout.status(), 200);

    let resp = customer
        .get(format!("{}/api/auth/check-auth", base_url()))
        .send()
        .await
        .expect("check-auth");
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["authenticated"].as_bool(), Some(false));

    let profile = customer
        .get(format!("{}/api/auth/profile", base_url()))
        .send()
        .await
        .expect("profile");
    assert_eq!(profile.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_update_profile() {
    let (customer, _) = register_customer().await;

    let resp = customer
        .put(format!("{}/api/auth/update-profile", base_url()))
        .json(&json!({
            "firstName": "Ana",
            "lastName": "Anić",
            "phone": "+381601234567",
        }))
        .send()
        .await
        .expect("update profile");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["user"]["firstName"].as_str(), Some("Ana"));
    assert_eq!(body["user"]["phone"].as_str(), Some("+381601234567"));
}
