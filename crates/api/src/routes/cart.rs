//! Cart route handlers.
//!
//! Every mutation responds with the full cart as the server now sees it -
//! the SPA replaces its local cart wholesale instead of patching it, so the
//! two views cannot drift. All cart routes require authentication; the cart
//! is scoped to the session's user and is never shared.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use vitrina_core::ProductId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::cart::{CartEntry, CartItemView};
use crate::services::CartService;
use crate::state::AppState;

/// Default quantity when the add request omits one.
const fn default_quantity() -> i32 {
    1
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// Quote request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub promo_code: Option<String>,
}

/// `{ "cart": [...] }`, optionally with a status message.
fn cart_body(entries: &[CartEntry], message: Option<&str>) -> Json<Value> {
    let views: Vec<CartItemView> = entries.iter().map(CartItemView::from).collect();

    match message {
        Some(message) => Json(json!({ "message": message, "cart": views })),
        None => Json(json!({ "cart": views })),
    }
}

/// Current cart.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let entries = CartService::new(state.pool()).fetch(user.id).await?;

    Ok(cart_body(&entries, None))
}

/// Add a product to the cart.
///
/// Adding a product already in the cart increments its quantity; the merge
/// happens server-side.
#[instrument(skip(state, user, request))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<Value>> {
    let entries = CartService::new(state.pool())
        .add(user.id, request.product_id, request.quantity)
        .await?;

    Ok(cart_body(&entries, Some("Proizvod je dodat u korpu")))
}

/// Set the quantity of a product in the cart.
#[instrument(skip(state, user, request))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<Value>> {
    let entries = CartService::new(state.pool())
        .update(user.id, product_id, request.quantity)
        .await?;

    Ok(cart_body(&entries, Some("Količina je izmenjena")))
}

/// Remove a product from the cart. Idempotent.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Value>> {
    let entries = CartService::new(state.pool())
        .remove(user.id, product_id)
        .await?;

    Ok(cart_body(&entries, Some("Proizvod je uklonjen iz korpe")))
}

/// Empty the cart.
#[instrument(skip(state, user))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let entries = CartService::new(state.pool()).clear(user.id).await?;

    Ok(cart_body(&entries, Some("Korpa je ispražnjena")))
}

/// Server-computed totals for the current cart.
///
/// The only preview channel for subtotal/discount/shipping/total; checkout
/// prices the order with the same function.
#[instrument(skip(state, user, request))]
pub async fn quote(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<Value>> {
    let quote = CartService::new(state.pool())
        .quote(user.id, request.promo_code.as_deref())
        .await?;

    Ok(Json(json!({ "quote": quote })))
}
