//! Order repository.
//!
//! Orders are written once (at checkout, inside the checkout transaction)
//! and afterwards only their `status`/`updated_at` may change. Status writes
//! are compare-and-set against the status the transition was validated
//! from, so two concurrent admin edits cannot smuggle an illegal transition
//! through.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use vitrina_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, OrderStats, ShippingAddress};

/// Row type for `shop.orders`.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    user_id: i32,
    status: String,
    payment_method: String,
    subtotal: i64,
    discount: i64,
    promo_code: Option<String>,
    shipping_fee: i64,
    total_amount: i64,
    street: String,
    city: String,
    postal_code: String,
    country: String,
    contact_phone: Option<String>,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(RepositoryError::DataCorruption)?;
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Order {
            id: OrderId::new(self.id),
            order_number: self.order_number,
            user_id: UserId::new(self.user_id),
            status,
            payment_method,
            subtotal: self.subtotal,
            discount: self.discount,
            promo_code: self.promo_code,
            shipping_fee: self.shipping_fee,
            total_amount: self.total_amount,
            shipping_address: ShippingAddress {
                street: self.street,
                city: self.city,
                postal_code: self.postal_code,
                country: self.country,
                phone: self.contact_phone,
                note: self.note,
            },
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row type for `shop.order_items`.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: i32,
    product_id: i32,
    quantity: i32,
    price_at_time: i64,
}

const ORDER_COLUMNS: &str = "id, order_number, user_id, status, payment_method, subtotal, \
     discount, promo_code, shipping_fee, total_amount, street, city, postal_code, country, \
     contact_phone, note, created_at, updated_at";

/// Fields for creating an order at checkout.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub user_id: UserId,
    pub payment_method: PaymentMethod,
    pub subtotal: i64,
    pub discount: i64,
    pub promo_code: Option<&'a str>,
    pub shipping_fee: i64,
    pub total_amount: i64,
    pub address: &'a ShippingAddress,
    pub items: &'a [OrderItem],
}

/// Create an order and its item snapshots inside an open transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
pub async fn create_in(
    conn: &mut PgConnection,
    new_order: NewOrder<'_>,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "INSERT INTO shop.orders \
             (order_number, user_id, status, payment_method, subtotal, discount, \
              promo_code, shipping_fee, total_amount, street, city, postal_code, \
              country, contact_phone, note) \
         VALUES ($1, $2, 'pending', $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(new_order.order_number)
    .bind(new_order.user_id.as_i32())
    .bind(new_order.payment_method.as_str())
    .bind(new_order.subtotal)
    .bind(new_order.discount)
    .bind(new_order.promo_code)
    .bind(new_order.shipping_fee)
    .bind(new_order.total_amount)
    .bind(&new_order.address.street)
    .bind(&new_order.address.city)
    .bind(&new_order.address.postal_code)
    .bind(&new_order.address.country)
    .bind(new_order.address.phone.as_deref())
    .bind(new_order.address.note.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    for item in new_order.items {
        sqlx::query(
            "INSERT INTO shop.order_items (order_id, product_id, quantity, price_at_time) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(row.id)
        .bind(item.product_id.as_i32())
        .bind(item.quantity)
        .bind(item.price_at_time)
        .execute(&mut *conn)
        .await?;
    }

    row.into_order(new_order.items.to_vec())
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored fields are invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.items_for(&[row.id]).await?;
        let items = items.into_values().next().unwrap_or_default();

        Ok(Some(row.into_order(items)?))
    }

    /// All orders for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders \
             WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// A page of all orders, optionally filtered by status, newest first.
    ///
    /// Returns the page and the total count matching the filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_page(
        &self,
        status: Option<OrderStatus>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(status.map(OrderStatus::as_str))
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM shop.orders WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(OrderStatus::as_str))
        .fetch_one(self.pool)
        .await?;

        Ok((self.assemble(rows).await?, total))
    }

    /// Compare-and-set a status transition.
    ///
    /// The update only lands if the order still has the status the
    /// transition was validated from.
    ///
    /// # Returns
    ///
    /// Returns `true` if the row was updated, `false` if the order is gone
    /// or its status changed concurrently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.orders SET status = $3, updated_at = now() \
             WHERE id = $1 AND status = $2",
        )
        .bind(id.as_i32())
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete an order and its items.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.orders WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Derived aggregates for the admin dashboard, computed on read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self) -> Result<OrderStats, RepositoryError> {
        let row: (i64, i64, i64, i64, i64, Option<i64>) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE status = 'pending'), \
                    COUNT(*) FILTER (WHERE status = 'processing'), \
                    COUNT(*) FILTER (WHERE status = 'completed'), \
                    COUNT(*) FILTER (WHERE status = 'cancelled'), \
                    SUM(total_amount) FILTER (WHERE status = 'completed') \
             FROM shop.orders",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(OrderStats {
            total_orders: row.0,
            pending_count: row.1,
            processing_count: row.2,
            completed_count: row.3,
            cancelled_count: row.4,
            revenue: row.5.unwrap_or(0),
        })
    }

    /// Attach items to a set of order rows, preserving row order.
    async fn assemble(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut items = self.items_for(&ids).await?;

        rows.into_iter()
            .map(|row| {
                let order_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(order_items)
            })
            .collect()
    }

    /// Fetch items for a set of orders, grouped by order ID.
    async fn items_for(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<OrderItem>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT order_id, product_id, quantity, price_at_time \
             FROM shop.order_items WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(OrderItem {
                product_id: ProductId::new(row.product_id),
                quantity: row.quantity,
                price_at_time: row.price_at_time,
            });
        }

        Ok(grouped)
    }
}
