//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB probe)
//!
//! # Auth (session cookie)
//! POST /api/auth/register               - Create an account and log in
//! POST /api/auth/login                  - Log in
//! POST /api/auth/logout                 - Log out
//! GET  /api/auth/check-auth             - Session probe for the SPA
//! GET  /api/auth/profile                - Current user's profile
//! PUT  /api/auth/update-profile         - Update profile fields
//!
//! # Cart (requires auth)
//! GET    /api/cart                      - Current cart
//! POST   /api/cart/add                  - Add product (merges quantities)
//! PUT    /api/cart/update/{productId}   - Set quantity (>= 1)
//! DELETE /api/cart/remove/{productId}   - Remove product (idempotent)
//! DELETE /api/cart/clear                - Empty the cart
//! POST   /api/cart/quote                - Server-computed totals preview
//!
//! # Orders
//! POST   /api/orders                    - Checkout (cart -> order)
//! GET    /api/orders?page&limit&status  - All orders, paginated (admin)
//! GET    /api/orders/user/{userId}      - A user's orders (owner or admin)
//! GET    /api/orders/admin/all          - Admin alias of the paginated list
//! GET    /api/orders/admin/stats        - Derived aggregates (admin)
//! GET    /api/orders/{id}               - One order (owner or admin)
//! PUT    /api/orders/{id}               - Status transition (admin)
//! DELETE /api/orders/{id}               - Hard delete (admin)
//!
//! # Catalog
//! GET    /api/products?page&limit&search&brand - Product listing
//! GET    /api/products/{id}             - Product detail
//! POST   /api/products                  - Create product (admin)
//! PUT    /api/products/{id}             - Update product (admin)
//! DELETE /api/products/{id}             - Delete product (admin)
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
///
/// Login and registration are rate limited per IP.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter());

    Router::new()
        .merge(limited)
        .route("/logout", post(auth::logout))
        .route("/check-auth", get(auth::check_auth))
        .route("/profile", get(auth::profile))
        .route("/update-profile", put(auth::update_profile))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update/{product_id}", put(cart::update))
        .route("/remove/{product_id}", delete(cart::remove))
        .route("/clear", delete(cart::clear))
        .route("/quote", post(cart::quote))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::list))
        .route("/user/{user_id}", get(orders::list_for_user))
        .route("/admin/all", get(orders::list))
        .route("/admin/stats", get(orders::stats))
        .route(
            "/{id}",
            get(orders::show).put(orders::update).delete(orders::remove),
        )
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/products", product_routes())
}
