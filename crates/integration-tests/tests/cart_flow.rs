//! Integration tests for the cart API.
//!
//! Requires a running server, migrated database, and admin credentials
//! (see crate docs). Run with `cargo test -- --ignored`.

use serde_json::Value;
use vitrina_integration_tests::{
    add_to_cart, admin_client, base_url, create_product, register_customer,
};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_add_merges_instead_of_duplicating() {
    let admin = admin_client().await;
    let product = create_product(&admin, 1_000, None).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (customer, _) = register_customer().await;

    add_to_cart(&customer, product_id, 2).await;
    let body = add_to_cart(&customer, product_id, 3).await;

    let cart = body["cart"].as_array().expect("cart array");
    let lines: Vec<&Value> = cart
        .iter()
        .filter(|line| line["productId"].as_i64() == Some(product_id))
        .collect();

    // One line for the product, quantities merged.
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"].as_i64(), Some(5));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_remove_is_idempotent() {
    let admin = admin_client().await;
    let product = create_product(&admin, 1_000, None).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (customer, _) = register_customer().await;
    add_to_cart(&customer, product_id, 1).await;

    let url = format!("{}/api/cart/remove/{product_id}", base_url());

    let first = customer.delete(&url).send().await.expect("first remove");
    assert_eq!(first.status(), 200);
    let first_body: Value = first.json().await.expect("body");

    // Removing an absent item is not an error and yields the same cart.
    let second = customer.delete(&url).send().await.expect("second remove");
    assert_eq!(second.status(), 200);
    let second_body: Value = second.json().await.expect("body");

    assert_eq!(first_body["cart"], second_body["cart"]);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_update_quantity_floor() {
    let admin = admin_client().await;
    let product = create_product(&admin, 1_000, None).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (customer, _) = register_customer().await;
    add_to_cart(&customer, product_id, 2).await;

    let url = format!("{}/api/cart/update/{product_id}", base_url());

    for quantity in [0_i64, -1] {
        let resp = customer
            .put(&url)
            .json(&serde_json::json!({ "quantity": quantity }))
            .send()
            .await
            .expect("update request");
        assert_eq!(resp.status(), 400, "quantity {quantity} must be rejected");
    }

    // The stored quantity is untouched.
    let resp = customer
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("fetch cart");
    let body: Value = resp.json().await.expect("body");
    let line = body["cart"]
        .as_array()
        .expect("cart array")
        .iter()
        .find(|line| line["productId"].as_i64() == Some(product_id))
        .expect("line present")
        .clone();
    assert_eq!(line["quantity"].as_i64(), Some(2));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_update_rejects_quantity_above_stock() {
    let admin = admin_client().await;
    let product = create_product(&admin, 1_000, Some(3)).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (customer, _) = register_customer().await;
    add_to_cart(&customer, product_id, 1).await;

    let resp = customer
        .put(format!("{}/api/cart/update/{product_id}", base_url()))
        .json(&serde_json::json!({ "quantity": 10 }))
        .send()
        .await
        .expect("update request");

    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.expect("body");
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("stanju"),
        "stock error message should be user-facing"
    );
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_cart_requires_authentication() {
    let anonymous = vitrina_integration_tests::client();

    let resp = anonymous
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("fetch cart");

    assert_eq!(resp.status(), 401);
}
