//! Order lifecycle service.
//!
//! Status changes go through the state machine in
//! [`OrderStatus::can_transition_to`]; everything else on an order is
//! immutable after creation. Admin aggregates are derived on read.

use sqlx::PgPool;
use thiserror::Error;

use vitrina_core::{OrderId, OrderStatus, UserId};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::models::order::{Order, OrderStats};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order not found.
    #[error("order not found")]
    NotFound,

    /// The update did not include a status.
    #[error("nothing to update: status missing")]
    MissingStatus,

    /// Items and shipping address are immutable after creation.
    #[error("field is immutable after creation: {0}")]
    ImmutableField(&'static str),

    /// The state machine rejects this transition.
    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition {
        /// Status the order currently has.
        from: OrderStatus,
        /// Status the caller asked for.
        to: OrderStatus,
    },

    /// Another actor changed the order between read and write.
    #[error("order was modified concurrently")]
    ConcurrentModification,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A `PUT /api/orders/{id}` body, reduced to intent.
///
/// The wire format accepts `items` and `shippingAddress` keys for
/// compatibility, but any attempt to use them is rejected.
#[derive(Debug)]
pub struct OrderUpdate {
    /// Requested status, if any.
    pub status: Option<OrderStatus>,
    /// Whether the request tried to replace items.
    pub items_present: bool,
    /// Whether the request tried to replace the shipping address.
    pub address_present: bool,
}

/// Order lifecycle service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn get(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders.get(id).await?.ok_or(OrderError::NotFound)
    }

    /// All orders for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// A page of all orders, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if a query fails.
    pub async fn list_page(
        &self,
        status: Option<OrderStatus>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Order>, i64), OrderError> {
        Ok(self.orders.list_page(status, page, limit).await?)
    }

    /// Apply an update to an order.
    ///
    /// Only the status may change. Setting the current status again is an
    /// idempotent no-op; any other transition must pass the state machine.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::ImmutableField` if the request tried to touch
    /// items or the address, `OrderError::MissingStatus` with nothing to do,
    /// `OrderError::InvalidTransition` when the state machine rejects the
    /// change, and `OrderError::ConcurrentModification` if another actor
    /// changed the status between read and write.
    pub async fn update(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        if update.items_present {
            return Err(OrderError::ImmutableField("items"));
        }
        if update.address_present {
            return Err(OrderError::ImmutableField("shippingAddress"));
        }
        let next = update.status.ok_or(OrderError::MissingStatus)?;

        let order = self.get(id).await?;

        if order.status == next {
            return Ok(order);
        }

        if !order.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }

        // Compare-and-set against the status the transition was validated
        // from; a concurrent admin edit makes this a no-op.
        if !self.orders.update_status(id, order.status, next).await? {
            return Err(OrderError::ConcurrentModification);
        }

        self.get(id).await
    }

    /// Hard-delete an order. Rare escape hatch, not part of the normal
    /// lifecycle.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), OrderError> {
        if self.orders.delete(id).await? {
            Ok(())
        } else {
            Err(OrderError::NotFound)
        }
    }

    /// Derived admin aggregates.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn stats(&self) -> Result<OrderStats, OrderError> {
        Ok(self.orders.stats().await?)
    }
}
