//! Order domain types.
//!
//! An order is an immutable snapshot of a cart: each item carries the unit
//! price resolved at creation time (`price_at_time`), insulated from later
//! catalog changes. Only `status` and `updated_at` change after creation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use vitrina_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

/// Delivery address embedded in an order. Immutable after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub note: Option<String>,
}

/// One item snapshot on an order.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// The ordered product.
    pub product_id: ProductId,
    /// Units ordered. Always >= 1.
    pub quantity: i32,
    /// Unit price at order creation, in RSD minor units. Never recalculated.
    pub price_at_time: i64,
}

impl OrderItem {
    /// Line total at the captured price.
    #[must_use]
    pub const fn line_total(&self) -> i64 {
        self.price_at_time * self.quantity as i64
    }
}

/// An order (domain type).
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Human-readable order number (`VTR-XXXXXXXX`).
    pub order_number: String,
    /// The user who placed the order.
    pub user_id: UserId,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// How the buyer pays.
    pub payment_method: PaymentMethod,
    /// Item subtotal at creation time.
    pub subtotal: i64,
    /// Promo discount amount applied at creation time.
    pub discount: i64,
    /// The promo code behind `discount`, if one was applied.
    pub promo_code: Option<String>,
    /// Shipping fee at creation time.
    pub shipping_fee: i64,
    /// Amount charged: subtotal - discount + shipping_fee.
    pub total_amount: i64,
    /// Delivery address.
    pub shipping_address: ShippingAddress,
    /// Item snapshots.
    pub items: Vec<OrderItem>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated (status changes only).
    pub updated_at: DateTime<Utc>,
}

/// Derived admin aggregates, computed on read and never stored.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_orders: i64,
    pub pending_count: i64,
    pub processing_count: i64,
    pub completed_count: i64,
    pub cancelled_count: i64,
    /// Sum of `total_amount` over completed orders.
    pub revenue: i64,
}

/// JSON representation of an order item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price_at_time: i64,
    pub line_total: i64,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            price_at_time: item.price_at_time,
            line_total: item.line_total(),
        }
    }
}

/// JSON representation of an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub subtotal: i64,
    pub discount: i64,
    pub promo_code: Option<String>,
    pub shipping_fee: i64,
    pub total_amount: i64,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderItemView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number.clone(),
            user_id: order.user_id,
            status: order.status,
            payment_method: order.payment_method,
            subtotal: order.subtotal,
            discount: order.discount,
            promo_code: order.promo_code.clone(),
            shipping_fee: order.shipping_fee,
            total_amount: order.total_amount,
            shipping_address: order.shipping_address.clone(),
            items: order.items.iter().map(OrderItemView::from).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_item_line_total() {
        let item = OrderItem {
            product_id: ProductId::new(5),
            quantity: 4,
            price_at_time: 1_000,
        };
        assert_eq!(item.line_total(), 4_000);
    }
}
