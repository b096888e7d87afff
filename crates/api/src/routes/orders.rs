//! Order route handlers.
//!
//! Checkout converts the server-side cart into an order; the request body
//! may echo the client's view of the items for compatibility, but the cart
//! stored on the server is authoritative and prices are always resolved
//! from the catalog.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use vitrina_core::{OrderId, OrderStatus, PaymentMethod, UserId};

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::order::{Order, OrderView};
use crate::services::checkout::{CheckoutData, CheckoutService};
use crate::services::orders::{OrderService, OrderUpdate};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Buyer personal data on the checkout form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Delivery data on the checkout form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddressData {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: Option<String>,
    pub note: Option<String>,
}

/// One client-side cart line, echoed in the checkout request.
///
/// Accepted for wire compatibility only; the server-side cart decides what
/// is ordered and at what price, so these fields are deserialized and then
/// deliberately unused.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct OrderItemRequest {
    pub product_id: i32,
    pub quantity: i32,
}

/// `POST /api/orders` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer: CustomerData,
    pub shipping_address: ShippingAddressData,
    pub payment_method: PaymentMethod,
    pub promo_code: Option<String>,
    #[allow(dead_code)]
    pub items: Option<Vec<OrderItemRequest>>,
}

/// `PUT /api/orders/{id}` body.
///
/// Only `status` is usable; `items` and `shippingAddress` are accepted by
/// the deserializer so the service can reject them explicitly instead of
/// silently dropping them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub items: Option<Value>,
    pub shipping_address: Option<Value>,
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<OrderStatus>,
}

/// Pagination metadata echoed with paginated listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationView {
    /// Build pagination metadata for a page of `total` rows.
    #[must_use]
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: {
                let divisor = i64::from(limit.max(1));
                (total + divisor - 1) / divisor
            },
        }
    }
}

fn order_views(orders: &[Order]) -> Vec<OrderView> {
    orders.iter().map(OrderView::from).collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Checkout: convert the cart into an order and clear the cart.
#[instrument(skip(state, user, request))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let order = CheckoutService::new(state.pool())
        .checkout(
            user.id,
            CheckoutData {
                first_name: &request.customer.first_name,
                last_name: &request.customer.last_name,
                email: &request.customer.email,
                phone: &request.customer.phone,
                street: &request.shipping_address.street,
                city: &request.shipping_address.city,
                postal_code: &request.shipping_address.postal_code,
                country: request.shipping_address.country.as_deref(),
                note: request.shipping_address.note.as_deref(),
                payment_method: request.payment_method,
                promo_code: request.promo_code.as_deref(),
            },
        )
        .await?;

    tracing::info!(order_id = %order.id, order_number = %order.order_number, "order created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Porudžbina je uspešno kreirana",
            "order": OrderView::from(&order),
        })),
    ))
}

/// Paginated listing of all orders, optionally filtered by status.
///
/// Serves both `GET /api/orders` and the `GET /api/orders/admin/all` alias.
#[instrument(skip(state, _admin))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (orders, total) = OrderService::new(state.pool())
        .list_page(query.status, page, limit)
        .await?;

    Ok(Json(json!({
        "orders": order_views(&orders),
        "pagination": PaginationView::new(page, limit, total),
    })))
}

/// A user's order history, newest first. Owner or admin only.
#[instrument(skip(state, user))]
pub async fn list_for_user(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(user_id): Path<UserId>,
) -> Result<Json<Value>> {
    if user.id != user_id && !user.is_admin() {
        return Err(AppError::Forbidden);
    }

    let orders = OrderService::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(Json(json!({ "orders": order_views(&orders) })))
}

/// One order. Owner or admin only.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    let order = OrderService::new(state.pool()).get(id).await?;

    if order.user_id != user.id && !user.is_admin() {
        return Err(AppError::Forbidden);
    }

    Ok(Json(json!({ "order": OrderView::from(&order) })))
}

/// Apply a status transition to an order.
#[instrument(skip(state, _admin, request))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<Value>> {
    let order = OrderService::new(state.pool())
        .update(
            id,
            OrderUpdate {
                status: request.status,
                items_present: request.items.is_some(),
                address_present: request.shipping_address.is_some(),
            },
        )
        .await?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");

    Ok(Json(json!({
        "message": "Status porudžbine je izmenjen",
        "order": OrderView::from(&order),
    })))
}

/// Hard-delete an order. Rare administrative escape hatch.
#[instrument(skip(state, _admin))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<StatusCode> {
    OrderService::new(state.pool()).delete(id).await?;

    tracing::info!(order_id = %id, "order deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Derived order aggregates for the admin dashboard.
#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>> {
    let stats = OrderService::new(state.pool()).stats().await?;

    Ok(Json(json!({ "stats": stats })))
}
