//! Cart repository.
//!
//! The cart is one row per (user, product); adds merge via upsert so a
//! product can never appear twice. Mutation + re-read run inside one
//! transaction (composed by the cart service) so every response is a
//! consistent snapshot of the server-side cart.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use vitrina_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::CartEntry;

/// Row type for the cart read model (cart line + joined product fields).
#[derive(Debug, sqlx::FromRow)]
struct CartEntryRow {
    product_id: i32,
    quantity: i32,
    added_at: DateTime<Utc>,
    name: String,
    brand: String,
    price: i64,
    stock: Option<i32>,
    image: Option<String>,
}

impl From<CartEntryRow> for CartEntry {
    fn from(row: CartEntryRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            added_at: row.added_at,
            name: row.name,
            brand: row.brand,
            price: row.price,
            stock: row.stock,
            image: row.image,
        }
    }
}

const ENTRY_QUERY: &str = "SELECT ci.product_id, ci.quantity, ci.added_at, \
            p.name, p.brand, p.price, p.stock, p.images[1] AS image \
     FROM shop.cart_items ci \
     JOIN shop.products p ON p.id = ci.product_id \
     WHERE ci.user_id = $1 \
     ORDER BY ci.added_at, ci.product_id";

/// Repository for cart reads outside a transaction.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the user's cart with joined product display fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn entries(&self, user_id: UserId) -> Result<Vec<CartEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartEntryRow>(ENTRY_QUERY)
            .bind(user_id.as_i32())
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(CartEntry::from).collect())
    }
}

/// Fetch the user's cart inside an open transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn entries_in(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Vec<CartEntry>, RepositoryError> {
    let rows = sqlx::query_as::<_, CartEntryRow>(ENTRY_QUERY)
        .bind(user_id.as_i32())
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.into_iter().map(CartEntry::from).collect())
}

/// Current quantity of a product in the user's cart, if present.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn current_quantity_in(
    conn: &mut PgConnection,
    user_id: UserId,
    product_id: ProductId,
) -> Result<Option<i32>, RepositoryError> {
    let row: Option<(i32,)> = sqlx::query_as(
        "SELECT quantity FROM shop.cart_items WHERE user_id = $1 AND product_id = $2",
    )
    .bind(user_id.as_i32())
    .bind(product_id.as_i32())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|(quantity,)| quantity))
}

/// Add `quantity` of a product, merging with an existing line.
///
/// The increment happens in the database so concurrent adds can never
/// produce duplicate lines or lose an increment.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn upsert_item_in(
    conn: &mut PgConnection,
    user_id: UserId,
    product_id: ProductId,
    quantity: i32,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO shop.cart_items (user_id, product_id, quantity) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (user_id, product_id) \
         DO UPDATE SET quantity = shop.cart_items.quantity + EXCLUDED.quantity",
    )
    .bind(user_id.as_i32())
    .bind(product_id.as_i32())
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Set the quantity of an existing cart line.
///
/// # Returns
///
/// Returns `true` if a line was updated, `false` if the product was not in
/// the cart.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn set_quantity_in(
    conn: &mut PgConnection,
    user_id: UserId,
    product_id: ProductId,
    quantity: i32,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        "UPDATE shop.cart_items SET quantity = $3 WHERE user_id = $1 AND product_id = $2",
    )
    .bind(user_id.as_i32())
    .bind(product_id.as_i32())
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a product from the cart. Idempotent: removing an absent product
/// is not an error.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn remove_item_in(
    conn: &mut PgConnection,
    user_id: UserId,
    product_id: ProductId,
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM shop.cart_items WHERE user_id = $1 AND product_id = $2")
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Empty the user's cart.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn clear_in(conn: &mut PgConnection, user_id: UserId) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM shop.cart_items WHERE user_id = $1")
        .bind(user_id.as_i32())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Fetch and lock the user's cart lines for checkout.
///
/// Locks only the cart rows (`FOR UPDATE OF ci`) so two checkouts of the
/// same cart serialize; the second sees the cart the first left behind.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn lines_for_update_in(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Vec<CartEntry>, RepositoryError> {
    let rows = sqlx::query_as::<_, CartEntryRow>(
        "SELECT ci.product_id, ci.quantity, ci.added_at, \
                p.name, p.brand, p.price, p.stock, p.images[1] AS image \
         FROM shop.cart_items ci \
         JOIN shop.products p ON p.id = ci.product_id \
         WHERE ci.user_id = $1 \
         ORDER BY ci.added_at, ci.product_id \
         FOR UPDATE OF ci",
    )
    .bind(user_id.as_i32())
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(CartEntry::from).collect())
}
