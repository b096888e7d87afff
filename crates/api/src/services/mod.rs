//! Domain services.
//!
//! Services own the business rules and compose repositories; transactional
//! flows (cart mutations, checkout) open the transaction here and hand the
//! connection to `db::*_in` functions.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use checkout::{CheckoutError, CheckoutService};
pub use orders::{OrderError, OrderService};
