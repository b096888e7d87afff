//! Integration tests for checkout: cart-to-order conversion, price
//! snapshots, and the cleared-cart guarantee.
//!
//! Requires a running server, migrated database, and admin credentials
//! (see crate docs). Run with `cargo test -- --ignored`.

use serde_json::{Value, json};
use vitrina_integration_tests::{
    add_to_cart, admin_client, base_url, checkout_body, create_product, register_customer,
};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_checkout_creates_order_and_clears_cart() {
    let admin = admin_client().await;
    let product = create_product(&admin, 2_500, None).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (customer, _) = register_customer().await;
    add_to_cart(&customer, product_id, 2).await;

    let resp = customer
        .post(format!("{}/api/orders", base_url()))
        .json(&checkout_body())
        .send()
        .await
        .expect("checkout");
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.expect("body");
    let order = &body["order"];
    assert_eq!(order["status"].as_str(), Some("pending"));
    assert_eq!(order["subtotal"].as_i64(), Some(5_000));

    // The cart is emptied server-side in the same transaction.
    let cart_resp = customer
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("fetch cart");
    let cart_body: Value = cart_resp.json().await.expect("body");
    assert_eq!(cart_body["cart"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_checkout_with_empty_cart_rejected() {
    let (customer, _) = register_customer().await;

    let resp = customer
        .post(format!("{}/api/orders", base_url()))
        .json(&checkout_body())
        .send()
        .await
        .expect("checkout");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"].as_str(), Some("Korpa je prazna"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_checkout_validation_fails_fast() {
    let admin = admin_client().await;
    let product = create_product(&admin, 1_000, None).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (customer, _) = register_customer().await;
    add_to_cart(&customer, product_id, 1).await;

    // Email without a TLD and a bad phone at once; the email error wins
    // because validation is fail-fast in form order.
    let mut body = checkout_body();
    body["customer"]["email"] = json!("marko@example");
    body["customer"]["phone"] = json!("+38164123");

    let resp = customer
        .post(format!("{}/api/orders", base_url()))
        .json(&body)
        .send()
        .await
        .expect("checkout");

    assert_eq!(resp.status(), 400);
    let response: Value = resp.json().await.expect("body");
    assert_eq!(
        response["message"].as_str(),
        Some("Unesite ispravnu email adresu")
    );

    // The cart is left intact for retry.
    let cart_resp = customer
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .expect("fetch cart");
    let cart_body: Value = cart_resp.json().await.expect("body");
    assert_eq!(cart_body["cart"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_price_at_time_survives_catalog_change() {
    let admin = admin_client().await;
    let product = create_product(&admin, 1_000, None).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (customer, _) = register_customer().await;
    add_to_cart(&customer, product_id, 1).await;

    let resp = customer
        .post(format!("{}/api/orders", base_url()))
        .json(&checkout_body())
        .send()
        .await
        .expect("checkout");
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("body");
    let order_id = body["order"]["id"].as_i64().expect("order id");
    let total_before = body["order"]["totalAmount"].as_i64().expect("total");

    // Double the live catalog price.
    let update = admin
        .put(format!("{}/api/products/{product_id}", base_url()))
        .json(&json!({
            "name": product["name"],
            "brand": product["brand"],
            "sku": product["sku"],
            "price": 2_000,
            "stock": product["stock"],
        }))
        .send()
        .await
        .expect("price update");
    assert_eq!(update.status(), 200);

    // The order still carries the price captured at creation.
    let order_resp = customer
        .get(format!("{}/api/orders/{order_id}", base_url()))
        .send()
        .await
        .expect("fetch order");
    let order_body: Value = order_resp.json().await.expect("body");
    let item = &order_body["order"]["items"][0];

    assert_eq!(item["priceAtTime"].as_i64(), Some(1_000));
    assert_eq!(
        order_body["order"]["totalAmount"].as_i64(),
        Some(total_before)
    );
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_promo_code_is_resolved_server_side() {
    let admin = admin_client().await;
    let product = create_product(&admin, 10_000, None).await;
    let product_id = product["id"].as_i64().expect("product id");

    let (customer, _) = register_customer().await;
    add_to_cart(&customer, product_id, 1).await;

    let mut body = checkout_body();
    body["promoCode"] = json!("POPUST10");

    let resp = customer
        .post(format!("{}/api/orders", base_url()))
        .json(&body)
        .send()
        .await
        .expect("checkout");
    assert_eq!(resp.status(), 201);

    let response: Value = resp.json().await.expect("body");
    let order = &response["order"];
    assert_eq!(order["discount"].as_i64(), Some(1_000));
    assert_eq!(order["promoCode"].as_str(), Some("POPUST10"));

    // Unknown codes reject the checkout instead of silently charging full
    // price.
    let product2 = create_product(&admin, 10_000, None).await;
    add_to_cart(&customer, product2["id"].as_i64().expect("id"), 1).await;

    let mut bad = checkout_body();
    bad["promoCode"] = json!("NEPOSTOJI");
    let bad_resp = customer
        .post(format!("{}/api/orders", base_url()))
        .json(&bad)
        .send()
        .await
        .expect("checkout");
    assert_eq!(bad_resp.status(), 400);
}
