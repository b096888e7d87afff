//! Cart service.
//!
//! Every mutation runs mutation + re-read in one transaction and returns
//! the full cart, so the client never patches local state and server and
//! client views cannot drift. Quantity and stock rules live here:
//! quantities are never below 1, and tracked stock is a ceiling.

use sqlx::PgPool;
use thiserror::Error;

use vitrina_core::{ProductId, UserId, pricing};

use crate::db::RepositoryError;
use crate::db::carts::{self, CartRepository};
use crate::db::products;
use crate::models::cart::{CartEntry, subtotal};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity below 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The referenced product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The product is not in the cart (update path only; removal is
    /// idempotent).
    #[error("product not in cart")]
    NotInCart,

    /// The requested quantity exceeds tracked stock.
    #[error("not enough stock: {available} available")]
    InsufficientStock {
        /// Units currently in stock.
        available: i32,
    },

    /// Unrecognized promo code.
    #[error("unknown promo code: {0}")]
    UnknownPromo(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the user's current cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the read fails; the caller's view
    /// of the cart is left at its previous value.
    pub async fn fetch(&self, user_id: UserId) -> Result<Vec<CartEntry>, CartError> {
        Ok(CartRepository::new(self.pool).entries(user_id).await?)
    }

    /// Add a product to the cart, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for quantities below 1,
    /// `CartError::ProductNotFound` for unknown products, and
    /// `CartError::InsufficientStock` if the merged quantity would exceed
    /// tracked stock.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartEntry>, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let product = products::get_in(&mut tx, product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        let existing = carts::current_quantity_in(&mut tx, user_id, product_id)
            .await?
            .unwrap_or(0);
        let merged = existing.saturating_add(quantity);

        if !product.has_stock_for(merged) {
            return Err(CartError::InsufficientStock {
                available: product.stock.unwrap_or(0),
            });
        }

        carts::upsert_item_in(&mut tx, user_id, product_id, quantity).await?;
        let entries = carts::entries_in(&mut tx, user_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(entries)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// Quantities never drop below 1 through this path; removal is a
    /// distinct operation.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for quantities below 1,
    /// `CartError::ProductNotFound`/`NotInCart` for missing references, and
    /// `CartError::InsufficientStock` past the tracked-stock ceiling.
    pub async fn update(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Vec<CartEntry>, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let product = products::get_in(&mut tx, product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        if !product.has_stock_for(quantity) {
            return Err(CartError::InsufficientStock {
                available: product.stock.unwrap_or(0),
            });
        }

        if !carts::set_quantity_in(&mut tx, user_id, product_id, quantity).await? {
            return Err(CartError::NotInCart);
        }
        let entries = carts::entries_in(&mut tx, user_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(entries)
    }

    /// Remove a product from the cart. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Vec<CartEntry>, CartError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        carts::remove_item_in(&mut tx, user_id, product_id).await?;
        let entries = carts::entries_in(&mut tx, user_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(entries)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<Vec<CartEntry>, CartError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        carts::clear_in(&mut tx, user_id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(Vec::new())
    }

    /// Server-computed quote for the current cart.
    ///
    /// This is the only preview channel for totals: the same pricing
    /// function prices the order at checkout.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownPromo` for unrecognized codes.
    pub async fn quote(
        &self,
        user_id: UserId,
        promo_code: Option<&str>,
    ) -> Result<pricing::Quote, CartError> {
        let entries = self.fetch(user_id).await?;
        let subtotal = subtotal(&entries);

        pricing::quote(subtotal, promo_code).map_err(|e| CartError::UnknownPromo(e.code))
    }
}
